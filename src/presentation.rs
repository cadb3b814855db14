use crate::client::Outcome;
use crate::models::PredictionResponse;
use serde::Serialize;

/// Lifecycle of the result region
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PresentationState {
    #[default]
    Initial,
    Loading,
    Success(PredictionResponse),
    Error(String),
}

/// Visual style of the result box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Error,
}

/// What should be on screen for a given state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    /// "Fill in the form" hint
    pub placeholder_visible: bool,
    /// Result box with heading and tone
    pub result_visible: bool,
    /// Spinner shown and submit disabled
    pub loading: bool,
    /// Predicted class, or "Error"
    pub heading: Option<String>,
    /// Style of the result box, set whenever it is visible
    pub tone: Option<Tone>,
    /// Explanatory line under the heading, only used for errors
    pub message: Option<String>,
}

impl View {
    pub fn submit_enabled(&self) -> bool {
        !self.loading
    }
}

pub fn render(state: &PresentationState) -> View {
    match state {
        PresentationState::Initial => View {
            placeholder_visible: true,
            result_visible: false,
            loading: false,
            heading: None,
            tone: None,
            message: None,
        },
        PresentationState::Loading => View {
            placeholder_visible: true,
            result_visible: false,
            loading: true,
            heading: None,
            tone: None,
            message: None,
        },
        PresentationState::Success(response) => View {
            placeholder_visible: false,
            result_visible: true,
            loading: false,
            heading: Some(response.prediction.clone()),
            tone: Some(if response.is_positive() {
                Tone::Positive
            } else {
                Tone::Negative
            }),
            message: None,
        },
        PresentationState::Error(message) => View {
            placeholder_visible: false,
            result_visible: true,
            loading: false,
            heading: Some("Error".to_string()),
            tone: Some(Tone::Error),
            message: Some(message.clone()),
        },
    }
}

/// Owns the presentation state of the result region
#[derive(Debug, Default)]
pub struct Presenter {
    state: PresentationState,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn view(&self) -> View {
        render(&self.state)
    }

    /// Enter `Loading` for a new submission.
    ///
    /// The returned guard borrows the presenter mutably, so no second
    /// submission can begin until this one is finished or dropped.
    pub fn begin_submit(&mut self) -> Submission<'_> {
        let previous = std::mem::replace(&mut self.state, PresentationState::Loading);
        Submission {
            presenter: self,
            previous: Some(previous),
        }
    }
}

/// A submission in flight.
///
/// Dropping it without calling `finish` (a cancelled request) restores the
/// state shown before the submission started.
#[derive(Debug)]
pub struct Submission<'a> {
    presenter: &'a mut Presenter,
    previous: Option<PresentationState>,
}

impl Submission<'_> {
    #[cfg(test)]
    pub fn view(&self) -> View {
        self.presenter.view()
    }

    /// Leave `Loading` with the outcome of the exchange
    pub fn finish(mut self, outcome: Outcome) -> View {
        self.previous = None;
        self.presenter.state = match outcome {
            Outcome::Success(response) => PresentationState::Success(response),
            Outcome::Failure(error) => PresentationState::Error(error.to_string()),
        };
        self.presenter.view()
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.presenter.state = previous;
        }
    }
}
