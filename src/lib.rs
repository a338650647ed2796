pub mod errors;
pub mod context;
pub mod engine;
pub mod ops;
pub mod token;
pub mod value;
pub mod datalog;
pub mod series;
pub mod config;
pub mod plot;

pub use config::{PlotConfig, SeriesConfig};
pub use context::{Context, MissingFieldPolicy};
pub use datalog::Datalog;
pub use engine::Evaluator;
pub use errors::{ConfigError, DatalogError, EvalError, Result};
pub use ops::Op;
pub use value::Value;

/// Evaluate an expression with no data bound.
pub fn calculate(expr: &str) -> Result<Value> {
    Evaluator::new().calculate(expr)
}

/// Evaluate an expression against `ctx` with the strict missing-field policy.
pub fn calculate_with(ctx: Context, expr: &str) -> Result<Value> {
    let mut calc = Evaluator::new();
    calc.load_data(ctx);
    calc.calculate(expr)
}
