use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("error: invalid emission schedule: {0}")]
    InvalidSchedule(String),
    #[error("error: scaling by 10^{0} overflows u128")]
    DecimalsOverflow(u8),
}
