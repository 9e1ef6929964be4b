mod output;

pub use output::RecordingOutput;
