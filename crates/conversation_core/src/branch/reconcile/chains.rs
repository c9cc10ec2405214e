//! Phase B: merge pairwise sibling records into complete chains.
//!
//! Phase A only links a message to the versions on one parent/child edge.
//! When three or more versions share a row through separate edges, each
//! message holds a partial list. Here every row's lists become edges of a
//! graph whose weakly connected components are the chains, and each list
//! is replaced by the chain that contains it.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::debug;
use uuid::Uuid;

use super::view::{BranchedConversation, VersionSummary};

pub fn merge_chains(tree: &mut BranchedConversation) {
    for row in 0..tree.row_count() {
        let candidates: Vec<usize> = tree
            .versions
            .iter()
            .enumerate()
            .filter(|(_, version)| {
                version
                    .messages
                    .get(row)
                    .is_some_and(|message| !message.versions.is_empty())
            })
            .map(|(index, _)| index)
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let mut graph = SiblingGraph::default();
        for &index in &candidates {
            graph.add_list(&tree.versions[index].messages[row].versions);
        }
        let chains = graph.chains();
        debug!(
            "[{}] Row {}: {} candidates, {} chains",
            tree.id,
            row,
            candidates.len(),
            chains.len()
        );

        for &index in &candidates {
            let message = &mut tree.versions[index].messages[row];
            if let Some(chain) = chains.iter().find(|chain| chain.covers(&message.versions)) {
                message.versions = chain.members.clone();
            }
        }
    }
}

/// A maximal set of versions sharing a message at one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chain {
    ids: HashSet<Uuid>,
    pub(crate) members: Vec<VersionSummary>,
}

impl Chain {
    fn covers(&self, versions: &[VersionSummary]) -> bool {
        versions.iter().all(|v| self.ids.contains(&v.id))
    }
}

/// Directed graph linking consecutive entries of each sorted sibling list
#[derive(Debug, Default)]
pub(crate) struct SiblingGraph {
    nodes: HashMap<Uuid, VersionSummary>,
    outgoing: HashMap<Uuid, BTreeSet<Uuid>>,
    incoming: HashMap<Uuid, BTreeSet<Uuid>>,
}

impl SiblingGraph {
    pub(crate) fn add_list(&mut self, list: &[VersionSummary]) {
        for summary in list {
            self.nodes.entry(summary.id).or_insert_with(|| summary.clone());
        }
        for pair in list.windows(2) {
            let (from, to) = (pair[0].id, pair[1].id);
            if from == to {
                continue;
            }
            self.outgoing.entry(from).or_default().insert(to);
            self.incoming.entry(to).or_default().insert(from);
        }
    }

    fn neighbours(&self, id: &Uuid) -> impl Iterator<Item = &Uuid> {
        self.outgoing
            .get(id)
            .into_iter()
            .chain(self.incoming.get(id))
            .flatten()
    }

    /// Weakly connected components, walked from chain starts (nodes without
    /// incoming edges) first.
    pub(crate) fn chains(&self) -> Vec<Chain> {
        let mut order: Vec<&VersionSummary> = self.nodes.values().collect();
        order.sort();
        let starts = order
            .iter()
            .filter(|summary| !self.incoming.contains_key(&summary.id));
        let rest = order
            .iter()
            .filter(|summary| self.incoming.contains_key(&summary.id));

        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut chains = Vec::new();

        for start in starts.chain(rest) {
            if visited.contains(&start.id) {
                continue;
            }

            let mut members = Vec::new();
            let mut stack = vec![start.id];
            while let Some(id) = stack.pop() {
                if !visited.insert(id) {
                    continue;
                }
                if let Some(summary) = self.nodes.get(&id) {
                    members.push(summary.clone());
                }
                stack.extend(
                    self.neighbours(&id)
                        .filter(|n| !visited.contains(*n))
                        .copied(),
                );
            }

            members.sort();
            chains.push(Chain {
                ids: members.iter().map(|m| m.id).collect(),
                members,
            });
        }

        chains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn summary(offset_secs: i64) -> VersionSummary {
        VersionSummary {
            id: Uuid::new_v4(),
            created_at: DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_overlapping_lists_form_one_chain() {
        let (a, b, c) = (summary(1), summary(2), summary(3));
        let mut graph = SiblingGraph::default();
        graph.add_list(&[a.clone(), b.clone()]);
        graph.add_list(&[b.clone(), c.clone()]);

        let chains = graph.chains();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].members, vec![a, b, c]);
    }

    #[test]
    fn test_disjoint_lists_stay_apart() {
        let (a, b, c, d) = (summary(1), summary(2), summary(3), summary(4));
        let mut graph = SiblingGraph::default();
        graph.add_list(&[a.clone(), c.clone()]);
        graph.add_list(&[b.clone(), d.clone()]);

        let chains = graph.chains();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].members, vec![a, c]);
        assert_eq!(chains[1].members, vec![b, d]);
    }

    #[test]
    fn test_duplicates_do_not_hide_chain_starts() {
        let (a, b) = (summary(1), summary(2));
        let mut graph = SiblingGraph::default();
        graph.add_list(&[a.clone(), a.clone(), b.clone()]);

        let chains = graph.chains();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].members, vec![a, b]);
    }

    #[test]
    fn test_chain_reached_against_edge_direction() {
        // b -> c and a -> c: starting from a must still collect b
        let (a, b, c) = (summary(1), summary(2), summary(3));
        let mut graph = SiblingGraph::default();
        graph.add_list(&[a.clone(), c.clone()]);
        graph.add_list(&[b.clone(), c.clone()]);

        let chains = graph.chains();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].members, vec![a, b, c]);
    }
}
