pub mod backjob_service;
pub mod error;
pub mod escrow_service;
pub mod job_service;
pub mod kyc_service;
pub mod registration_service;
pub mod team_assignment_service;
