//! Maps UI service errors to skycheck_core::AppError for consistent user-facing messages.

mod weather;
