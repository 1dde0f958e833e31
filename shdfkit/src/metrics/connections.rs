//! Wiring checks: duplicates, endpoint conflicts, direct connections.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::document::{Connection, ShdfDocument};
use crate::mapping::breadboard::is_breadboard_endpoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedConnection {
    pub index: usize,
    pub connection: Connection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateConnections {
    pub duplicate_connections: usize,
    pub duplicate_connection_list: Vec<IndexedConnection>,
}

/// Connections whose unordered endpoint pair was already seen.
pub fn check_duplicate_connections(document: &ShdfDocument) -> DuplicateConnections {
    let mut seen = HashSet::new();
    let mut result = DuplicateConnections::default();

    for (index, connection) in document.connections.iter().enumerate() {
        if !seen.insert(connection.unordered_key()) {
            result.duplicate_connections += 1;
            result.duplicate_connection_list.push(IndexedConnection {
                index,
                connection: connection.clone(),
            });
        }
    }
    result
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConflict {
    pub endpoint: String,
    pub connection_indices: Vec<usize>,
    pub connection_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointConflicts {
    pub endpoint_conflicts: usize,
    pub conflict_endpoints: Vec<EndpointConflict>,
}

/// Endpoints used by more than one connection, in order of first use.
pub fn check_endpoint_conflicts(document: &ShdfDocument) -> EndpointConflicts {
    let mut order: Vec<&str> = Vec::new();
    let mut usage: HashMap<&str, Vec<usize>> = HashMap::new();

    for (index, connection) in document.connections.iter().enumerate() {
        for endpoint in connection.endpoints() {
            usage
                .entry(endpoint)
                .or_insert_with(|| {
                    order.push(endpoint);
                    Vec::new()
                })
                .push(index);
        }
    }

    let conflict_endpoints: Vec<EndpointConflict> = order
        .into_iter()
        .filter_map(|endpoint| {
            let indices = usage.remove(endpoint)?;
            (indices.len() > 1).then(|| EndpointConflict {
                endpoint: endpoint.to_string(),
                connection_count: indices.len(),
                connection_indices: indices,
            })
        })
        .collect();

    EndpointConflicts {
        endpoint_conflicts: conflict_endpoints.len(),
        conflict_endpoints,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectConnections {
    pub direct_connections: usize,
    pub breadboard_connections: usize,
    pub direct_connection_list: Vec<IndexedConnection>,
    pub direct_connection_percentage: f64,
    pub breadboard_connection_percentage: f64,
}

/// Connections that bypass the breadboard. Both percentages are 0 for a
/// document without connections.
pub fn check_direct_connections(document: &ShdfDocument) -> DirectConnections {
    let mut result = DirectConnections::default();

    for (index, connection) in document.connections.iter().enumerate() {
        if connection.endpoints().iter().any(|e| is_breadboard_endpoint(e)) {
            result.breadboard_connections += 1;
        } else {
            result.direct_connections += 1;
            result.direct_connection_list.push(IndexedConnection {
                index,
                connection: connection.clone(),
            });
        }
    }

    let total = document.connections.len();
    if total > 0 {
        result.direct_connection_percentage = result.direct_connections as f64 * 100.0 / total as f64;
        result.breadboard_connection_percentage = result.breadboard_connections as f64 * 100.0 / total as f64;
    }
    result
}
