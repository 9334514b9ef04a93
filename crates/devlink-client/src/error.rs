use devlink_shared::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {}", problem_title(.problem))]
    Api {
        status: u16,
        problem: Option<ErrorResponse>,
    },
}

fn problem_title(problem: &Option<ErrorResponse>) -> &str {
    problem.as_ref().map_or("no details", |p| p.title.as_str())
}
