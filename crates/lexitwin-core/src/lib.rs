pub mod completion;
pub mod model;
pub mod stage;
pub mod wire;

pub use completion::Completion;
pub use model::{
    ArtifactKind, ConfigurationPayload, Dtl, DtLib, GenerationBundle, InterfaceSpec, IoField,
    LibStatus, LogicPayload, NewComment, NewTestCase, OntologyPayload, ReviewComment,
    ReviewStatus, SegmentSuggestion, TestCase, TestCasePatch, TestResult, TestRunReport,
};
pub use stage::{Sequencer, Stage};
pub use wire::{DtLibPatch, DtLibWire, DtlPatch, DtlWire, NewDtl, NewDtLib};
