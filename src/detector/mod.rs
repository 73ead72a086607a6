mod fraud_detector;

pub use fraud_detector::{Detection, FraudDetector, DEFAULT_SENSITIVITY};
