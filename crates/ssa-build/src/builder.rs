//! Shared state for the expression/statement lowering routines: the
//! procedure under construction plus the frontend tables it reads from.

use alloc::string::String;

use ssa_frontend::{EntityTable, TypeAndValueMap};
use ssa_ir::{BuildContext, ProcId, Procedure, Signature};

pub struct Builder<'f> {
    pub ctx: BuildContext,
    pub entities: &'f EntityTable,
    pub types: &'f TypeAndValueMap,
    pub proc: Procedure,
    #[cfg(feature = "trace-lowering")]
    pub trace_sink: String,
}

impl<'f> Builder<'f> {
    pub fn new(
        ctx: BuildContext,
        entities: &'f EntityTable,
        types: &'f TypeAndValueMap,
        proc_id: ProcId,
        name: String,
        signature: Signature,
    ) -> Self {
        Self {
            ctx,
            entities,
            types,
            proc: Procedure::new(proc_id, name, signature),
            #[cfg(feature = "trace-lowering")]
            trace_sink: String::new(),
        }
    }

    pub fn finish(self) -> Procedure {
        self.proc
    }
}
