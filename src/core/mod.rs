pub mod backup;
pub mod change;
pub mod deadline;
pub mod report;
pub mod restore;
