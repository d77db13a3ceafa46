pub mod classifier_trait;
pub mod logistic;

pub use classifier_trait::{ClassifierModel, FitSummary};
pub use logistic::LogisticRegression;
