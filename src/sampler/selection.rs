use std::collections::{HashMap, HashSet, VecDeque};

/// Which processes make up the monitored group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRule {
    All,
    ProcessGroup(u32),
    /// The root process and everything forked beneath it.
    Descendants(u32),
    Pids(Vec<u32>),
    User(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSelection {
    pub rule: SelectionRule,
    pub exclude_users: Vec<String>,
}

/// Sampler-independent view of a live process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub parent: Option<u32>,
    pub pgid: Option<u32>,
    pub name: String,
    pub user: Option<String>,
    /// CPU usage since the previous refresh, in CPUs.
    pub cpu_usage: f64,
}

impl ProcessSelection {
    pub fn new(rule: SelectionRule, exclude_users: Vec<String>) -> Self {
        Self {
            rule,
            exclude_users,
        }
    }

    /// Process-group ids only have to be resolved for the `ProcessGroup` rule.
    pub fn needs_pgid(&self) -> bool {
        matches!(self.rule, SelectionRule::ProcessGroup(_))
    }

    pub fn select<'a>(&self, processes: &'a [ProcessInfo]) -> Vec<&'a ProcessInfo> {
        let matched: Vec<&ProcessInfo> = match &self.rule {
            SelectionRule::All => processes.iter().collect(),
            SelectionRule::ProcessGroup(pgid) => processes
                .iter()
                .filter(|p| p.pgid == Some(*pgid))
                .collect(),
            SelectionRule::Descendants(root) => {
                let members = descendants_of(*root, processes);
                processes
                    .iter()
                    .filter(|p| members.contains(&p.pid))
                    .collect()
            }
            SelectionRule::Pids(pids) => processes
                .iter()
                .filter(|p| pids.contains(&p.pid))
                .collect(),
            SelectionRule::User(user) => processes
                .iter()
                .filter(|p| p.user.as_deref() == Some(user.as_str()))
                .collect(),
        };

        matched
            .into_iter()
            .filter(|p| !self.is_excluded(p))
            .collect()
    }

    fn is_excluded(&self, process: &ProcessInfo) -> bool {
        process
            .user
            .as_ref()
            .is_some_and(|u| self.exclude_users.iter().any(|x| x == u))
    }
}

fn descendants_of(root: u32, processes: &[ProcessInfo]) -> HashSet<u32> {
    let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
    for p in processes {
        if let Some(parent) = p.parent {
            children.entry(parent).or_default().push(p.pid);
        }
    }

    let mut members = HashSet::new();
    if !processes.iter().any(|p| p.pid == root) {
        return members;
    }

    let mut queue = VecDeque::from([root]);
    while let Some(pid) = queue.pop_front() {
        if !members.insert(pid) {
            continue;
        }
        if let Some(kids) = children.get(&pid) {
            queue.extend(kids.iter().copied());
        }
    }
    members
}
