//! Reporter configuration

use super::{Capturing, Colored, Deferred, DotsReporter, Stream, TeamCityReporter, TimedReporter, VerboseReporter};
use crate::observer::{Composite, Observer};

/// Which reporters to run, and how the text reporter is decorated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Print every context and assertion as it runs instead of dots and a failure summary
    pub verbose: bool,
    /// Capture spec stdout and show it under failures
    pub capture: bool,
    /// Colour pass and failure lines
    pub colour: bool,
    /// Print the run's duration
    pub timing: bool,
    /// Emit TeamCity service messages instead of text
    pub teamcity: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            capture: true,
            colour: true,
            timing: true,
            teamcity: false,
        }
    }
}

impl ReporterConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_colour(mut self, colour: bool) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_teamcity(mut self, teamcity: bool) -> Self {
        self.teamcity = teamcity;
        self
    }

    /// Assemble the reporters, in dispatch order.
    pub fn observers(&self, stream: &Stream) -> Vec<Box<dyn Observer>> {
        if self.teamcity {
            return vec![Box::new(TeamCityReporter::new(stream.clone()))];
        }

        let mut observers: Vec<Box<dyn Observer>> = Vec::new();
        if !self.verbose {
            observers.push(Box::new(DotsReporter::new(stream.fork())));
        }

        let mut text: Box<dyn Observer> = Box::new(VerboseReporter::new(stream.clone()));
        if self.colour {
            text = Box::new(Colored::new(text, stream.clone()));
        }
        if self.capture {
            text = Box::new(Capturing::new(text, stream.clone()));
        }
        if !self.verbose {
            text = Box::new(Deferred::new(text, stream.clone()));
        }
        observers.push(text);

        if self.timing {
            observers.push(Box::new(TimedReporter::new(stream.fork())));
        }
        observers
    }

    /// Assemble the reporters behind a composite with a view-model aggregator.
    pub fn build(&self, stream: Stream) -> Composite {
        Composite::new(self.observers(&stream))
    }
}
