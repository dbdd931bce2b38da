use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// setup logging from an optional environment filter
///
/// without a filter in the environment logging stays off. Output goes to
/// stderr so it never fights the terminal frontend for stdout.
pub fn setup(env_filter: Result<EnvFilter, tracing_subscriber::filter::FromEnvError>) {
    match env_filter {
        Ok(env_filter) => {
            let sbuilder = Subscriber::builder()
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc3339())
                .with_level(true)
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr);
            let ss = sbuilder.with_ansi(false).finish();
            tracing::subscriber::set_global_default(ss)
                .expect("setting tracing default subscriber failed");
        }
        Err(_) => {}
    };
}
