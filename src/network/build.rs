use std::collections::HashMap;

use tracing::debug;

use super::{DependencyLink, DependencyNode, Network, NodeId, TreeNode};
use crate::contracts::Service;

pub fn build_network(services: &[Service]) -> Network {
    let mut nodes = services
        .iter()
        .map(|service| DependencyNode {
            name: service.name.clone(),
            version: service.version.clone(),
            is_provider: service.is_provider(),
            is_consumer: service.is_consumer(),
            links: Vec::new(),
            level: 0,
        })
        .collect::<Vec<_>>();

    let mut details_nodes = services
        .iter()
        .map(|service| TreeNode {
            name: service.name.clone(),
            consumers: Vec::new(),
            providers: Vec::new(),
        })
        .collect::<Vec<_>>();

    let mut by_name = HashMap::new();
    let mut by_identity = HashMap::new();
    for (id, node) in nodes.iter().enumerate() {
        by_name.entry(node.name.as_str()).or_insert(id);
        by_identity
            .entry((node.name.as_str(), node.version.as_str()))
            .or_insert(id);
    }

    let mut pairs = Vec::new();
    let mut links = Vec::new();
    let mut dangling = 0usize;
    for service in services {
        let Some(&source) = by_identity.get(&(service.name.as_str(), service.version.as_str()))
        else {
            continue;
        };

        for (provider, contracts) in &service.expectations {
            let Some(&target) = by_name.get(provider.as_str()) else {
                debug!(consumer = %service.name, %provider, "dropping expectation on unknown provider");
                dangling += 1;
                continue;
            };

            for kind in contracts.keys() {
                links.push(DependencyLink {
                    source,
                    target,
                    kind: kind.clone(),
                });
            }

            if !contracts.is_empty() {
                pairs.push((source, target));
            }
        }
    }

    for &(source, target) in &pairs {
        push_unique(&mut nodes[source].links, target);
        push_unique(&mut nodes[target].links, source);
        push_unique(&mut details_nodes[source].providers, target);
        push_unique(&mut details_nodes[target].consumers, source);
    }

    debug!(
        nodes = nodes.len(),
        links = links.len(),
        dangling,
        "built dependency network"
    );

    Network {
        nodes,
        links,
        details_nodes,
    }
}

fn push_unique(list: &mut Vec<usize>, id: usize) {
    if !list.contains(&id) {
        list.push(id);
    }
}

pub fn filter_connected_nodes(network: &Network) -> Vec<NodeId> {
    network
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            network.links.iter().any(|link| {
                node.same_service(&network.nodes[link.source])
                    || node.same_service(&network.nodes[link.target])
            })
        })
        .map(|(id, _)| id)
        .collect()
}
