/// Interactive 3D view of the four fundamental subspaces of a matrix.
///
/// The subspaces are computed by a separate solver service; this program only
/// sends it the matrix and draws what comes back.
#[derive(Debug, Clone, clap::Parser)]
#[command(version, about)]
pub struct Args {
    /// Base URL of the solver, or of the gateway in front of it.
    #[arg(long, env = "SUBSPACE_SOLVER_URL", default_value = "http://localhost:5000")]
    pub solver_url: String,

    /// Path of the calculation endpoint (`/api/calculate` behind the gateway).
    #[arg(long, default_value = "/calculate")]
    pub calculate_path: String,

    /// Path of the health endpoint (`/api/health` behind the gateway).
    #[arg(long, default_value = "/health")]
    pub health_path: String,

    /// Request timeout in seconds.
    #[arg(long, env = "SUBSPACE_SOLVER_TIMEOUT", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Don't ping the solver at startup.
    #[arg(long)]
    pub skip_health_check: bool,

    /// Initial window width.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Initial window height.
    #[arg(long, default_value_t = 800.0)]
    pub height: f32,
}
