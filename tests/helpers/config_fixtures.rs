//! Common configuration fixtures for tests.

pub const HOSTNAME_ONLY: &str = "hostname r1\n";

pub const FORWARD_REFERENCE: &str = r#"
hostname edge1
!
interface GigabitEthernet0/0
 ip address 10.0.0.1 255.255.255.0
 ip access-group AL1 in
!
ip access-list extended AL1
 permit tcp any any eq 22
!
"#;

pub const DUPLICATE_ROUTE_MAP_CLAUSE: &str = r#"
route-map RM1 permit 10
 set local-preference 200
!
route-map RM1 permit 10
 set metric 50
!
"#;

pub const INTERFACE_ALIASES: &str = r#"
interface Eth0/1
 description uplink
!
interface Ethernet0/1
 bandwidth 1000000
!
"#;

pub const LOOPBACK_ALIASES: &str = r#"
interface Loopback0
 ip address 192.0.2.1 255.255.255.255
!
interface Lo0
 description router-id
!
"#;

pub const INTERFACE_REOPENED: &str = r#"
interface GigabitEthernet0/0
 description first
 mtu 1400
!
interface Gi0/0
 description second
 mtu 9000
!
"#;

pub const BGP_UNDECLARED_NEIGHBOR: &str = r#"
router bgp 65000
 neighbor 10.0.0.2 remote-as 65001
 neighbor 10.0.0.3 description not declared
!
"#;

pub const BGP_UNSUPPORTED_FAMILY: &str = r#"
router bgp 65000
 neighbor 10.0.0.2 remote-as 65001
 address-family vpnv4
  neighbor 10.0.0.2 route-map VPN-IN in
 exit-address-family
!
"#;

pub const BGP_ADDRESS_FAMILY_POLICY: &str = r#"
router bgp 65000
 neighbor 10.0.0.2 remote-as 65001
 address-family ipv4 unicast
  neighbor 10.0.0.2 route-map IN in
 exit-address-family
!
route-map IN permit 10
!
"#;

pub const OSPF_AREA_ASSIGNMENT: &str = r#"
interface GigabitEthernet0/0
 ip address 10.1.1.1 255.255.255.0
!
interface GigabitEthernet0/1
 ip address 10.2.2.1 255.255.255.0
!
interface GigabitEthernet0/2
 ip address 192.168.9.1 255.255.255.0
!
router ospf 1
 network 10.1.1.0 0.0.0.255 area 0
 network 10.0.0.0 0.255.255.255 area 5
!
"#;

pub const XR_ROUTE_POLICY: &str = r#"
prefix-set PS-CUST
  10.0.0.0/8 le 24,
  192.168.0.0/16
end-set
!
route-policy RP-IN
  if destination in PS-CUST then
    set local-preference 200
    pass
  else
    drop
  endif
end-policy
!
"#;

pub const UNTERMINATED_QUOTE: &str = "hostname r1\nsnmp-server location \"rack 4\n";

pub const MANAGEMENT: &str = r#"
ip domain-name example.net
ntp server 192.0.2.10 prefer
logging host 192.0.2.20
snmp-server community public RO SNMP-ACL
!
line vty 0 4
 access-class VTY-IN in
 transport input ssh
!
"#;
