mod happy_path;
mod idempotence;
mod partial_failure;
mod staleness;
