pub mod composer;

pub use composer::ReportComposer;
