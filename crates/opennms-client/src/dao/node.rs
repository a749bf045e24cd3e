//! Node lookups and graph assembly
//!
//! [`NodeDao`] reads nodes and their SNMP interfaces, IP interfaces and
//! monitored services from the `rest/nodes` resource. [`NodeDao::fetch`]
//! assembles a complete node graph with every child linked back to its
//! parent.

use super::envelope::unwrap_collection;
use super::mapper;
use crate::common::query::Filter;
use crate::common::RequestOptions;
use crate::error::OnmsError;
use crate::http_trait::OnmsHttp;
use crate::models::{IpInterface, MonitoredService, Node, ParentRef, SnmpInterface};
use futures::future::try_join_all;
use serde_json::Value;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Node reference accepted by the sub-resource lookups
#[derive(Debug, Clone, Copy)]
pub enum NodeKey<'a> {
    ById(u64),
    ByEntity(&'a Node),
}

impl NodeKey<'_> {
    pub fn id(self) -> u64 {
        match self {
            NodeKey::ById(id) => id,
            NodeKey::ByEntity(node) => node.id(),
        }
    }
}

impl From<u64> for NodeKey<'_> {
    fn from(id: u64) -> Self {
        NodeKey::ById(id)
    }
}

impl<'a> From<&'a Node> for NodeKey<'a> {
    fn from(node: &'a Node) -> Self {
        NodeKey::ByEntity(node)
    }
}

/// IP interface reference accepted by [`NodeDao::services`]
#[derive(Debug, Clone, Copy)]
pub enum InterfaceKey<'a> {
    ByAddress(IpAddr),
    ByEntity(&'a IpInterface),
}

impl InterfaceKey<'_> {
    pub fn address(self) -> IpAddr {
        match self {
            InterfaceKey::ByAddress(address) => address,
            InterfaceKey::ByEntity(iface) => iface.ip_address,
        }
    }
}

impl From<IpAddr> for InterfaceKey<'_> {
    fn from(address: IpAddr) -> Self {
        InterfaceKey::ByAddress(address)
    }
}

impl<'a> From<&'a IpInterface> for InterfaceKey<'a> {
    fn from(iface: &'a IpInterface) -> Self {
        InterfaceKey::ByEntity(iface)
    }
}

/// Data access for nodes
#[derive(Clone)]
pub struct NodeDao {
    http: Arc<dyn OnmsHttp>,
}

impl std::fmt::Debug for NodeDao {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeDao")
            .field("base_url", &self.http.base_url())
            .finish()
    }
}

impl NodeDao {
    pub fn new(http: Arc<dyn OnmsHttp>) -> Self {
        Self { http }
    }

    fn options(filter: Option<&Filter>) -> RequestOptions {
        RequestOptions::json().with_filter(filter)
    }

    async fn get_json(&self, path: &str, filter: Option<&Filter>) -> Result<Value, OnmsError> {
        self.http.get(path, &Self::options(filter)).await?.into_json()
    }

    /// Get a node by ID, optionally with its full interface/service graph
    pub async fn get(&self, id: u64, recurse: bool) -> Result<Arc<Node>, OnmsError> {
        debug!("Getting node {} (recurse: {})", id, recurse);
        let body = self.get_json(&format!("rest/nodes/{id}"), None).await?;
        let node = mapper::node(&body)?;
        if recurse {
            self.fetch(node).await
        } else {
            Ok(Arc::new(node))
        }
    }

    /// Find nodes matching an optional filter
    pub async fn find(&self, filter: Option<&Filter>) -> Result<Vec<Node>, OnmsError> {
        debug!("Finding nodes (filter: {:?})", filter.map(Filter::params));
        let body = self.get_json("rest/nodes", filter).await?;
        unwrap_collection(body, "node")?
            .iter()
            .map(mapper::node)
            .collect()
    }

    /// Load every child of `node` and link it back to its parent
    ///
    /// SNMP interfaces and IP interfaces are fetched in that order, then the
    /// services of every IP interface concurrently. Nothing is linked until
    /// every fetch has succeeded; the first failure aborts the assembly.
    pub async fn fetch(&self, node: Node) -> Result<Arc<Node>, OnmsError> {
        let key = NodeKey::ById(node.id());
        debug!("Assembling node {}", key.id());

        let snmp_interfaces = self.snmp_interfaces(key, None).await?;
        let ip_interfaces = self.ip_interfaces(key, None).await?;
        let services = try_join_all(
            ip_interfaces
                .iter()
                .map(|iface| self.services(key, InterfaceKey::ByEntity(iface), None)),
        )
        .await?;

        let ip_interfaces = ip_interfaces.into_iter().zip(services).collect();
        Ok(link_graph(node, snmp_interfaces, ip_interfaces))
    }

    /// SNMP interfaces of a node
    pub async fn snmp_interfaces(
        &self,
        node: NodeKey<'_>,
        filter: Option<&Filter>,
    ) -> Result<Vec<SnmpInterface>, OnmsError> {
        let path = format!("rest/nodes/{}/snmpinterfaces", node.id());
        debug!("Listing SNMP interfaces: {}", path);
        let body = self.get_json(&path, filter).await?;
        unwrap_collection(body, "snmpInterface")?
            .iter()
            .map(mapper::snmp_interface)
            .collect()
    }

    /// IP interfaces of a node
    pub async fn ip_interfaces(
        &self,
        node: NodeKey<'_>,
        filter: Option<&Filter>,
    ) -> Result<Vec<IpInterface>, OnmsError> {
        let path = format!("rest/nodes/{}/ipinterfaces", node.id());
        debug!("Listing IP interfaces: {}", path);
        let body = self.get_json(&path, filter).await?;
        unwrap_collection(body, "ipInterface")?
            .iter()
            .map(mapper::ip_interface)
            .collect()
    }

    /// Monitored services of one IP interface of a node
    pub async fn services(
        &self,
        node: NodeKey<'_>,
        iface: InterfaceKey<'_>,
        filter: Option<&Filter>,
    ) -> Result<Vec<MonitoredService>, OnmsError> {
        let address = iface.address().to_string();
        let path = format!(
            "rest/nodes/{}/ipinterfaces/{}/services",
            node.id(),
            urlencoding::encode(&address)
        );
        debug!("Listing services: {}", path);
        let body = self.get_json(&path, filter).await?;
        unwrap_collection(body, "service")?
            .iter()
            .map(mapper::monitored_service)
            .collect()
    }
}

fn link_graph(
    mut node: Node,
    snmp_interfaces: Vec<SnmpInterface>,
    ip_interfaces: Vec<(IpInterface, Vec<MonitoredService>)>,
) -> Arc<Node> {
    Arc::new_cyclic(|node_ref| {
        node.snmp_interfaces = snmp_interfaces
            .into_iter()
            .map(|mut iface| {
                iface.node = ParentRef::linked(node_ref);
                iface
            })
            .collect();

        node.ip_interfaces = ip_interfaces
            .into_iter()
            .map(|(mut iface, services)| {
                iface.node = ParentRef::linked(node_ref);
                Arc::new_cyclic(|iface_ref| {
                    iface.services = services
                        .into_iter()
                        .map(|mut service| {
                            service.node = ParentRef::linked(node_ref);
                            service.ip_interface = ParentRef::linked(iface_ref);
                            service
                        })
                        .collect();
                    iface
                })
            })
            .collect();

        node
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::helpers::*;
    use crate::mock::MockOnmsHttp;
    use serde_json::json;

    fn dao(mock: &MockOnmsHttp) -> NodeDao {
        NodeDao::new(Arc::new(mock.clone()))
    }

    fn mock_node_210() -> MockOnmsHttp {
        let mock = MockOnmsHttp::new("http://localhost:8980/opennms/");
        mock.respond_json("rest/nodes/210", node_record(210, "router-210"))
            .respond_json(
                "rest/nodes/210/snmpinterfaces",
                envelope(
                    "snmpInterface",
                    vec![snmp_interface_record(1, 1), snmp_interface_record(2, 2)],
                ),
            )
            .respond_json(
                "rest/nodes/210/ipinterfaces",
                envelope(
                    "ipInterface",
                    vec![
                        ip_interface_record(10, "192.168.0.1"),
                        ip_interface_record(11, "10.0.0.1"),
                    ],
                ),
            )
            .respond_json(
                "rest/nodes/210/ipinterfaces/192.168.0.1/services",
                envelope("service", vec![service_record(100, "ICMP"), service_record(101, "SNMP")]),
            )
            .respond_json(
                "rest/nodes/210/ipinterfaces/10.0.0.1/services",
                envelope("service", vec![service_record(102, "HTTP")]),
            );
        mock
    }

    #[tokio::test]
    async fn test_get_without_recurse() {
        let mock = mock_node_210();
        let node = dao(&mock).get(210, false).await.unwrap();

        assert_eq!(node.id(), 210);
        assert_eq!(node.label.as_deref(), Some("router-210"));
        assert!(node.snmp_interfaces.is_empty());
        assert!(node.ip_interfaces.is_empty());
        assert_eq!(mock.requested_paths(), vec!["rest/nodes/210"]);
    }

    #[tokio::test]
    async fn test_recursive_get_links_every_child_to_root() {
        let mock = mock_node_210();
        let node = dao(&mock).get(210, true).await.unwrap();

        assert_eq!(node.snmp_interfaces.len() + node.ip_interfaces.len(), 4);
        for iface in &node.snmp_interfaces {
            assert!(iface.node.points_to(&node));
        }
        for iface in &node.ip_interfaces {
            assert!(iface.node.points_to(&node));
            for service in &iface.services {
                assert!(service.node.points_to(&node));
                assert!(service.ip_interface.points_to(iface));
            }
        }

        let first = node.ip_interface("192.168.0.1".parse().unwrap()).unwrap();
        assert_eq!(first.services.len(), 2);
        assert_eq!(
            first.services[0].service_type.as_ref().and_then(|t| t.name.as_deref()),
            Some("ICMP")
        );
        let parent = first.node.get().unwrap();
        assert!(Arc::ptr_eq(&parent, &node));
    }

    #[tokio::test]
    async fn test_assembly_order() {
        let mock = mock_node_210();
        dao(&mock).get(210, true).await.unwrap();

        let paths = mock.requested_paths();
        assert_eq!(paths.len(), 5);
        assert_eq!(paths[0], "rest/nodes/210");
        assert_eq!(paths[1], "rest/nodes/210/snmpinterfaces");
        assert_eq!(paths[2], "rest/nodes/210/ipinterfaces");
        let mut service_paths = paths[3..].to_vec();
        service_paths.sort();
        assert_eq!(
            service_paths,
            vec![
                "rest/nodes/210/ipinterfaces/10.0.0.1/services",
                "rest/nodes/210/ipinterfaces/192.168.0.1/services",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_sub_fetch_aborts_assembly() {
        let mock = mock_node_210();
        mock.respond_status("rest/nodes/210/ipinterfaces/10.0.0.1/services", 500, "boom");

        let err = dao(&mock).get(210, true).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_unknown_code_in_child_aborts_assembly() {
        let mock = mock_node_210();
        mock.respond_json(
            "rest/nodes/210/snmpinterfaces",
            envelope("snmpInterface", vec![json!({"id": 1, "ifOperStatus": 99})]),
        );

        let err = dao(&mock).get(210, true).await.unwrap_err();
        assert!(matches!(err, OnmsError::UnknownEnumerationCode { .. }));
    }

    #[tokio::test]
    async fn test_find_handles_every_envelope_shape() {
        let mock = MockOnmsHttp::new("http://localhost:8980/opennms/");
        let nodes = dao(&mock);

        mock.respond_json("rest/nodes", json!({"count": 0, "totalCount": 0}));
        assert!(nodes.find(None).await.unwrap().is_empty());

        mock.respond_json("rest/nodes", envelope("node", vec![node_record(1, "only")]));
        let found = nodes.find(None).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label.as_deref(), Some("only"));

        mock.respond_json(
            "rest/nodes",
            array_envelope("node", vec![node_record(1, "a"), node_record(2, "b"), node_record(3, "c")]),
        );
        let ids: Vec<u64> = nodes.find(None).await.unwrap().iter().map(Node::id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_filter_is_passed_through() {
        let mock = MockOnmsHttp::new("http://localhost:8980/opennms/");
        mock.respond_json("rest/nodes", envelope("node", vec![]));

        let filter = Filter::new().param("label", "router").limit(5);
        dao(&mock).find(Some(&filter)).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].filter.as_ref(), Some(&filter));
    }

    #[tokio::test]
    async fn test_node_and_interface_keys() {
        let mock = mock_node_210();
        let nodes = dao(&mock);
        let node = Node::new(210);
        let iface = IpInterface::new(10, "192.168.0.1".parse().unwrap());

        let by_id = nodes
            .services(NodeKey::ById(210), InterfaceKey::ByAddress(iface.ip_address), None)
            .await
            .unwrap();
        let by_entity = nodes
            .services(NodeKey::ByEntity(&node), InterfaceKey::ByEntity(&iface), None)
            .await
            .unwrap();
        assert_eq!(by_id, by_entity);
        assert!(by_id.iter().all(|s| !s.node.is_loaded()));
    }

    #[tokio::test]
    async fn test_ipv6_interface_path_is_encoded() {
        let mock = MockOnmsHttp::new("http://localhost:8980/opennms/");
        mock.respond_json("rest/nodes/1/ipinterfaces/fe80%3A%3A1/services", envelope("service", vec![]));

        let services = dao(&mock)
            .services(NodeKey::ById(1), InterfaceKey::ByAddress("fe80::1".parse().unwrap()), None)
            .await
            .unwrap();
        assert!(services.is_empty());
    }
}
