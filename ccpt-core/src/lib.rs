pub mod io;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use io::{EventSink, InputEvent, InputSource, Key, ResultSink};
pub use phase::SessionPhase;
pub use stimulus::{Color, Shape, StimulusSpec};
pub use trial::{Trial, TrialResult, score};
