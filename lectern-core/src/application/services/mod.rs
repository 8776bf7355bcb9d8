pub mod access_gate;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod curriculum;
pub mod enrollment;
pub mod progress;

pub use access_gate::AccessGate;
pub use curriculum::CurriculumService;
pub use enrollment::EnrollmentService;
pub use progress::ProgressService;
