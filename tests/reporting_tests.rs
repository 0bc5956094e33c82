//! Reporter output: the plain, deferred, capturing, coloured and TeamCity presentations of one run.

mod common;

use common::scrub_frames;
use specrun::reporting::{Colored, DotsReporter, Stream, TeamCityReporter, VerboseReporter};
use specrun::{
    AssertionInfo, ContextFailure, ContextInfo, Observer, ReporterConfig, RoleId, SpecError, SuiteInfo, spec_println,
};

fn assertion(owner: &str, label: &str) -> AssertionInfo {
    AssertionInfo {
        owner: owner.to_string(),
        method: label.replace(' ', "_"),
        label: label.to_string(),
    }
}

/// One passing and one failing assertion, a passing parametrised context and a context whose action raised.
fn drive(observer: &mut dyn Observer) {
    let suite = SuiteInfo {
        name: "specs".to_string(),
        spec_count: 3,
    };
    observer.suite_started(&suite);

    let adding = ContextInfo::new("WhenAdding", None);
    observer.context_started(&adding);
    spec_println!("adding 1 and 2");
    let sum = assertion("WhenAdding", "the sum is three");
    observer.assertion_started(&sum);
    observer.assertion_passed(&sum);
    let odd = assertion("WhenAdding", "the sum is odd");
    observer.assertion_started(&odd);
    observer.assertion_failed(&odd, &SpecError::failure("expected an odd number"));
    observer.context_ended(&adding);

    let subtracting = ContextInfo::new("WhenSubtracting", Some("(3, 1)".to_string()));
    observer.context_started(&subtracting);
    let difference = assertion("WhenSubtracting", "the difference is two");
    observer.assertion_started(&difference);
    observer.assertion_passed(&difference);
    observer.context_ended(&subtracting);

    let dividing = ContextInfo::new("WhenDividing", None);
    observer.context_started(&dividing);
    observer.context_errored(
        &dividing,
        &ContextFailure {
            role: RoleId::Action,
            error: SpecError::error("division by zero"),
        },
    );
    observer.context_ended(&dividing);

    observer.suite_ended(&suite);
}

#[test]
fn test_verbose_output() {
    let (stream, buffer) = Stream::memory();
    let mut reporter = VerboseReporter::new(stream);
    drive(&mut reporter);

    assert!(reporter.failed());
    insta::assert_snapshot!(scrub_frames(&buffer.contents()), @r"
WhenAdding
  PASS: the sum is three
  FAIL: the sum is odd
    at <frame>
    AssertionFailure: expected an odd number
WhenSubtracting -> (3, 1)
  PASS: the difference is two
WhenDividing
  at <frame>
  Error: division by zero

----------------------------------------------------------------------
FAILED!
3 contexts, 3 assertions: 1 failed, 1 error
");
}

#[test]
fn test_default_output_shows_progress_then_failures_only() {
    let (stream, buffer) = Stream::memory();
    let mut composite = ReporterConfig::new()
        .with_colour(false)
        .with_timing(false)
        .build(stream);
    drive(&mut composite);

    assert!(composite.failed());
    insta::assert_snapshot!(scrub_frames(&buffer.contents()), @r"
.F.E
----------------------------------------------------------------------
WhenAdding
  FAIL: the sum is odd
    at <frame>
    AssertionFailure: expected an odd number
    ------------------ >> begin captured stdout << -------------------
    adding 1 and 2
    ------------------- >> end captured stdout << --------------------
WhenDividing
  at <frame>
  Error: division by zero
----------------------------------------------------------------------
FAILED!
3 contexts, 3 assertions: 1 failed, 1 error
");
}

#[test]
fn test_verbose_without_capture_keeps_every_line() {
    let (stream, buffer) = Stream::memory();
    let mut composite = ReporterConfig::new()
        .with_verbose(true)
        .with_capture(false)
        .with_colour(false)
        .with_timing(false)
        .build(stream);
    drive(&mut composite);

    let output = buffer.contents();
    assert!(output.starts_with("WhenAdding\n  PASS: the sum is three\n"));
    assert!(output.contains("  PASS: the difference is two\n"));
    assert!(!output.contains("captured stdout"));
    assert!(!output.contains(".F.E"));
}

#[test]
fn test_timing_line_follows_the_summary() {
    let (stream, buffer) = Stream::memory();
    let mut composite = ReporterConfig::new().with_colour(false).build(stream);
    drive(&mut composite);

    let output = buffer.contents();
    let last = output.lines().last().unwrap();
    assert!(last.starts_with('(') && last.ends_with(" seconds)"), "{last}");
}

#[test]
fn test_colours_wrap_outcome_lines() {
    let (stream, buffer) = Stream::memory();
    let mut reporter = Colored::new(VerboseReporter::new(stream.clone()), stream);
    drive(&mut reporter);

    let output = buffer.contents();
    assert!(output.contains("\x1b[32m  PASS: the sum is three\n\x1b[0m"));
    assert!(output.contains("\x1b[31m  FAIL: the sum is odd\n"));
    assert!(!output.contains("\x1b[32mWhenAdding"));
}

#[test]
fn test_dots() {
    let (stream, buffer) = Stream::memory();
    let mut reporter = DotsReporter::new(stream);
    drive(&mut reporter);
    assert_eq!(buffer.contents(), ".F.E");
}

#[test]
fn test_passing_run_prints_counts_only() {
    let (stream, buffer) = Stream::memory();
    let mut composite = ReporterConfig::new()
        .with_colour(false)
        .with_timing(false)
        .build(stream);
    let suite = SuiteInfo {
        name: "specs".to_string(),
        spec_count: 1,
    };
    let context = ContextInfo::new("WhenPassing", None);
    let passes = assertion("WhenPassing", "it passes");
    composite.suite_started(&suite);
    composite.context_started(&context);
    composite.assertion_started(&passes);
    composite.assertion_passed(&passes);
    composite.context_ended(&context);
    composite.suite_ended(&suite);

    assert!(!composite.failed());
    assert_eq!(
        buffer.contents(),
        format!(".\n{}\nPASSED!\n1 context, 1 assertion\n", "-".repeat(70))
    );
}

#[test]
fn test_context_with_two_errors_counts_once() {
    let (stream, buffer) = Stream::memory();
    let mut reporter = VerboseReporter::new(stream);
    let suite = SuiteInfo {
        name: "specs".to_string(),
        spec_count: 1,
    };
    let context = ContextInfo::new("WhenEverythingBreaks", None);
    reporter.suite_started(&suite);
    reporter.context_started(&context);
    for (role, message) in [(RoleId::Setup, "no database"), (RoleId::Teardown, "nothing to drop")] {
        let failure = ContextFailure {
            role,
            error: SpecError::error(message),
        };
        reporter.context_errored(&context, &failure);
    }
    reporter.context_ended(&context);
    reporter.suite_ended(&suite);

    let output = buffer.contents();
    assert!(output.ends_with("FAILED!\n1 context, 0 assertions: 0 failed, 1 error\n"), "{output}");
}

#[test]
fn test_teamcity_messages() {
    let (stream, buffer) = Stream::memory();
    let mut reporter = TeamCityReporter::new(stream);
    drive(&mut reporter);

    assert!(reporter.failed());
    insta::assert_snapshot!(scrub_frames(&buffer.contents()), @r"
##teamcity[testSuiteStarted name='specs']
##teamcity[testStarted name='WhenAdding -> the sum is three']
##teamcity[testStdOut name='WhenAdding -> the sum is three' out='adding 1 and 2|n']
##teamcity[testFinished name='WhenAdding -> the sum is three']
##teamcity[testStarted name='WhenAdding -> the sum is odd']
##teamcity[testFailed name='WhenAdding -> the sum is odd' message='expected an odd number' details='at <frame>|nAssertionFailure: expected an odd number']
##teamcity[testFinished name='WhenAdding -> the sum is odd']
##teamcity[testStarted name='WhenSubtracting -> (3, 1) -> the difference is two']
##teamcity[testFinished name='WhenSubtracting -> (3, 1) -> the difference is two']
##teamcity[testStarted name='WhenDividing']
##teamcity[testFailed name='WhenDividing' message='division by zero' details='at <frame>|nError: division by zero']
##teamcity[testFinished name='WhenDividing']
##teamcity[testSuiteFinished name='specs']
");
}

#[test]
fn test_teamcity_unexpected_error() {
    let (stream, buffer) = Stream::memory();
    let mut reporter = TeamCityReporter::new(stream);
    reporter.unexpected_error(&SpecError::error("it's [broken]"));

    let output = scrub_frames(&buffer.contents());
    assert!(output.starts_with("##teamcity[testStarted name='Test error']\n"));
    assert!(output.contains("message='it|'s |[broken|]'"));
    assert!(output.ends_with("##teamcity[testFinished name='Test error']\n"));
}
