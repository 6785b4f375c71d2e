const MAX_JOBS: usize = 32;

/// Environment override for the number of files compressed in parallel
pub const JOBS_ENV: &str = "CONTEXT_COMPRESS_JOBS";

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_jobs(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_JOBS)
}

/// Parallelism for a run: the `--jobs` flag, then the environment, then the CPU count
pub fn resolve_jobs(flag: Option<usize>) -> usize {
    match flag {
        Some(jobs) => jobs.clamp(1, MAX_JOBS),
        None => {
            let raw = std::env::var(JOBS_ENV).ok();
            parse_jobs(raw.as_deref(), default_jobs())
        }
    }
}
