use std::{fmt, sync::Arc};

use lectern_core::application::unit_of_work::AppUnitOfWork;
use lectern_core::collaborators::{EnrollmentNotifier, PlaybackUrlResolver};
use lectern_core::{AccessGate, CurriculumService, EnrollmentService, ProgressService};

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub config: Arc<Config>,
    pub access_gate: Arc<AccessGate>,
    pub curriculum: Arc<CurriculumService>,
    pub enrollment: Arc<EnrollmentService>,
    pub progress: Arc<ProgressService>,
    pub url_resolver: Arc<dyn PlaybackUrlResolver>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire the services over a unit of work and the host collaborators.
    pub fn new(
        unit_of_work: Arc<AppUnitOfWork>,
        config: Arc<Config>,
        url_resolver: Arc<dyn PlaybackUrlResolver>,
        notifier: Arc<dyn EnrollmentNotifier>,
    ) -> Self {
        Self {
            access_gate: Arc::new(AccessGate::new(Arc::clone(&unit_of_work))),
            curriculum: Arc::new(CurriculumService::new(
                Arc::clone(&unit_of_work),
                Arc::clone(&notifier),
            )),
            enrollment: Arc::new(EnrollmentService::new(Arc::clone(&unit_of_work), notifier)),
            progress: Arc::new(ProgressService::new(Arc::clone(&unit_of_work))),
            unit_of_work,
            config,
            url_resolver,
        }
    }
}
