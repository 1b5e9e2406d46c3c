//! Arena view over a snapshot's activities.
//!
//! Built once per pass: activities are addressed by their position in the
//! snapshot, and both the ownership tree and the precedence graph are held
//! as index adjacency lists. All traversals are iterative, so deep
//! hierarchies cannot overflow the call stack, and every traversal is
//! guarded against malformed (cyclic) input.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)
//! Kahn (1962), "Topological sorting of large networks"

use std::collections::{HashMap, VecDeque};

use crate::error::ScheduleError;
use crate::models::Activity;

/// Index-based adjacency over a slice of activities.
#[derive(Debug)]
pub(crate) struct ActivityGraph<'a> {
    activities: &'a [Activity],
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    unresolved: Vec<(usize, String)>,
}

impl<'a> ActivityGraph<'a> {
    /// Builds the arena. The first occurrence of a duplicated id wins.
    pub fn build(activities: &'a [Activity]) -> Self {
        let n = activities.len();
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(n);
        for (i, act) in activities.iter().enumerate() {
            index.entry(act.id.as_str()).or_insert(i);
        }

        let mut parent = vec![None; n];
        let mut children = vec![Vec::new(); n];
        let mut predecessors = vec![Vec::new(); n];
        let mut successors = vec![Vec::new(); n];
        let mut unresolved = Vec::new();

        for (i, act) in activities.iter().enumerate() {
            if let Some(p) = act.parent_id.as_deref().and_then(|p| index.get(p).copied()) {
                if p != i {
                    parent[i] = Some(p);
                    children[p].push(i);
                }
            }
            for dep in &act.dependencies {
                match index.get(dep.as_str()) {
                    Some(&j) => {
                        predecessors[i].push(j);
                        successors[j].push(i);
                    }
                    None => unresolved.push((i, dep.clone())),
                }
            }
        }

        Self {
            activities,
            parent,
            children,
            predecessors,
            successors,
            unresolved,
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Id at a position.
    #[inline]
    pub fn id(&self, i: usize) -> &'a str {
        &self.activities[i].id
    }

    /// Resolved parent of a node.
    #[inline]
    pub fn parent(&self, i: usize) -> Option<usize> {
        self.parent[i]
    }

    /// Children of a node, in snapshot order.
    #[inline]
    pub fn children(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    /// Resolved predecessors of a node.
    #[inline]
    pub fn predecessors(&self, i: usize) -> &[usize] {
        &self.predecessors[i]
    }

    /// Successors of a node (the transposed precedence graph).
    #[inline]
    pub fn successors(&self, i: usize) -> &[usize] {
        &self.successors[i]
    }

    /// Dependency references that did not resolve: (activity position, missing id).
    pub fn unresolved_dependencies(&self) -> &[(usize, String)] {
        &self.unresolved
    }

    /// Tree post-order: every child precedes its parent.
    ///
    /// Nodes caught in a parent cycle are still emitted exactly once; the
    /// visited set stops the walk from looping.
    pub fn tree_post_order(&self) -> Vec<usize> {
        let n = self.len();
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        // (node, next child slot)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        let starts = (0..n)
            .filter(|&i| self.parent[i].is_none())
            .chain(0..n);

        for start in starts {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            stack.push((start, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, slot) = *frame;
                if let Some(&child) = self.children[node].get(slot) {
                    frame.1 += 1;
                    if !visited[child] {
                        visited[child] = true;
                        stack.push((child, 0));
                    }
                } else {
                    order.push(node);
                    stack.pop();
                }
            }
        }

        order
    }

    /// Topological order of the precedence graph (predecessors first).
    ///
    /// Ties are broken by snapshot position, so the order is deterministic.
    ///
    /// # Errors
    /// [`ScheduleError::CycleDetected`] naming the ids of one cycle.
    pub fn topological_order(&self) -> Result<Vec<usize>, ScheduleError> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();
        let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &succ in &self.successors[node] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    queue.push_back(succ);
                }
            }
        }

        if order.len() == n {
            Ok(order)
        } else {
            let blocked: Vec<bool> = in_degree.iter().map(|&d| d > 0).collect();
            Err(ScheduleError::CycleDetected {
                ids: self.trace_cycle(&blocked),
            })
        }
    }

    /// Walks predecessor links among blocked nodes until one repeats.
    ///
    /// Every blocked node keeps at least one blocked predecessor, so the
    /// walk always closes a cycle. Returned in dependency direction with
    /// the first id repeated at the end.
    fn trace_cycle(&self, blocked: &[bool]) -> Vec<String> {
        let Some(start) = blocked.iter().position(|&b| b) else {
            return Vec::new();
        };

        let mut seen_at: HashMap<usize, usize> = HashMap::new();
        let mut path = Vec::new();
        let mut node = start;

        loop {
            if let Some(&at) = seen_at.get(&node) {
                let mut cycle: Vec<String> =
                    path[at..].iter().map(|&i| self.id(i).to_string()).collect();
                cycle.reverse();
                if let Some(first) = cycle.first().cloned() {
                    cycle.push(first);
                }
                return cycle;
            }
            seen_at.insert(node, path.len());
            path.push(node);

            match self.predecessors[node].iter().copied().find(|&p| blocked[p]) {
                Some(next) => node = next,
                None => return vec![self.id(node).to_string()],
            }
        }
    }

    /// Detects a cycle in the parent relation, returning its ids.
    pub fn parent_cycle(&self) -> Option<Vec<String>> {
        let n = self.len();
        // 0 = unvisited, 1 = on current chain, 2 = settled
        let mut state = vec![0u8; n];

        for start in 0..n {
            if state[start] != 0 {
                continue;
            }
            let mut chain = Vec::new();
            let mut node = Some(start);
            while let Some(i) = node {
                match state[i] {
                    0 => {
                        state[i] = 1;
                        chain.push(i);
                        node = self.parent[i];
                    }
                    1 => {
                        let at = chain.iter().position(|&c| c == i).unwrap_or(0);
                        let mut ids: Vec<String> =
                            chain[at..].iter().map(|&c| self.id(c).to_string()).collect();
                        ids.push(self.id(i).to_string());
                        return Some(ids);
                    }
                    _ => break,
                }
            }
            for i in chain {
                state[i] = 2;
            }
        }

        None
    }
}
