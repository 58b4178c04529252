//! The whole-program container: every procedure, keyed so the builder can
//! resolve cross-procedure references as they're discovered.

use crate::arena::Arena;
use crate::entity::{EntityId, ProcId};
use crate::proc::Procedure;

#[derive(Debug, Clone, Default)]
pub struct Module {
    pub procs: Arena<ProcId, Procedure>,
    pub entry_point: Option<EntityId>,
}

impl Module {
    pub fn new() -> Self {
        Self {
            procs: Arena::new(),
            entry_point: None,
        }
    }

    pub fn add_proc(&mut self, proc: Procedure) -> ProcId {
        self.procs.push(proc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_proc_assigns_ids_in_push_order() {
        let mut m = Module::new();
        let a = m.add_proc(Procedure::new(ProcId::new(0), "a".into(), crate::types::Signature::empty()));
        let b = m.add_proc(Procedure::new(ProcId::new(0), "b".into(), crate::types::Signature::empty()));
        assert_ne!(a, b);
        assert_eq!(m.procs.get(a).name, "a");
    }
}
