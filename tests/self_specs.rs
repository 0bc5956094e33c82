//! specrun's own behaviour, described as specs and run by its own harness.

use specrun::assertions::{assert_eq, assert_that};
use specrun::reporting::{ReporterConfig, Stream};
use specrun::{Caught, ClassifyError, Outcome, Spec, Suite, SuiteViewModel, catch, catch_with, spec};

#[derive(Default)]
struct WhenALabelIsBuilt {
    label: String,
}

#[spec]
impl WhenALabelIsBuilt {
    fn because_the_name_mixes_styles(&mut self) {
        self.label = specrun_core::readable_label("it_shouldParseJSON_quickly");
    }

    fn it_should_drop_the_leading_role_words(&self) {
        assert_eq(self.label.as_str(), "parse JSON quickly");
    }
}

#[derive(Default)]
struct WhenAnErrorIsCaught {
    caught: Option<Caught<std::num::ParseIntError>>,
    arguments: Vec<String>,
}

#[spec]
impl WhenAnErrorIsCaught {
    fn because_parsing_fails(&mut self) {
        let arguments = &mut self.arguments;
        self.caught = Some(catch_with(
            |text: &str| {
                arguments.push(text.to_string());
                text.parse::<i32>()
            },
            "twelve",
        ));
    }

    fn it_should_hand_back_the_original_error(&self) {
        let raised = self.caught.as_ref().and_then(Caught::raised);
        assert_that(raised.is_some(), "expected a ParseIntError");
    }

    fn it_should_have_called_the_function_with_its_arguments(&self) {
        assert_eq(self.arguments.clone(), vec!["twelve".to_string()]);
    }
}

#[derive(Default)]
struct WhenNothingIsRaised {
    caught: Option<Caught<std::fmt::Error>>,
}

#[spec]
impl WhenNothingIsRaised {
    fn because_the_function_succeeds(&mut self) {
        self.caught = Some(catch(|| Ok::<_, std::fmt::Error>(5)));
    }

    fn it_should_report_nothing(&self) {
        assert_that(self.caught.as_ref().is_some_and(Caught::is_nothing), "expected Caught::Nothing");
    }
}

#[derive(Default)]
struct AmbiguousSpec;

#[spec]
impl AmbiguousSpec {
    fn given_it(&self) {}
}

#[derive(Default)]
struct WhenASpecHasAnAmbiguousMethod {
    result: Option<Result<(), ClassifyError>>,
    view_model: SuiteViewModel,
}

#[spec]
impl WhenASpecHasAnAmbiguousMethod {
    fn because_we_try_running(&mut self) {
        self.result = Some(specrun::run(&AmbiguousSpec::definition(), &mut self.view_model));
    }

    fn it_should_refuse_to_run(&self) -> Outcome {
        let refused = matches!(self.result, Some(Err(ClassifyError::NamingAmbiguity { .. })));
        specrun::assertions::ensure(refused, format!("unexpected result {:?}", self.result))
    }

    fn it_should_not_have_started_anything(&self) {
        assert_eq(self.view_model.contexts().len(), 0);
    }
}

#[derive(Default)]
struct WhenASuitePasses {
    output: String,
}

#[spec]
impl WhenASuitePasses {
    fn because_we_run_the_inner_suite(&mut self) {
        let (stream, buffer) = Stream::memory();
        let mut reporters = ReporterConfig::new()
            .with_capture(false)
            .with_colour(false)
            .with_timing(false)
            .build(stream);
        let suite = Suite::new("inner").with(WhenALabelIsBuilt::definition());
        let _ = specrun::run_suite(&suite, &mut reporters);
        self.output = buffer.contents();
    }

    fn it_should_print_a_dot_per_assertion(&self) {
        assert_that(self.output.starts_with(".\n"), &self.output);
    }

    fn it_should_say_passed(&self) {
        assert_that(self.output.contains("PASSED!\n1 context, 1 assertion\n"), &self.output);
    }
}

fn main() -> std::process::ExitCode {
    let suite = Suite::new("specrun")
        .with(WhenALabelIsBuilt::definition())
        .with(WhenAnErrorIsCaught::definition())
        .with(WhenNothingIsRaised::definition())
        .with(WhenASpecHasAnAmbiguousMethod::definition())
        .with(WhenASuitePasses::definition());
    specrun::cli::harness::run_main(&suite)
}
