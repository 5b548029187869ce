//! Tracing setup for tests
//!
//! Each test gets its own JSON log at `<target-dir>/test-logs/<test_name>.log`,
//! deleted again when the test passes.

mod config;
mod path;
mod test_tracing;
mod writers;

pub use config::TracingConfig;
pub use test_tracing::TestTracing;
pub(crate) use writers::FlushingWriter;

/// Initialize tracing for the enclosing test function
///
/// ```no_run
/// use case_oracle::init_test_tracing;
///
/// #[test]
/// fn my_test() {
///     let _tracing = init_test_tracing!();
/// }
/// ```
#[macro_export]
macro_rules! init_test_tracing {
    (@name) => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        type_name_of(f)
            .strip_suffix("::f")
            .and_then(|s| s.split("::").last())
            .unwrap_or("unknown")
    }};
    () => {{
        $crate::logging::tracing_utils::TestTracing::init($crate::init_test_tracing!(@name))
    }};
    ($config:expr) => {{
        $crate::logging::tracing_utils::TestTracing::init_with_config(
            $crate::init_test_tracing!(@name),
            $config,
        )
    }};
}
