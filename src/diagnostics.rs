//! Parse-error reporting.

use std::io::{self, IsTerminal};

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config};
use pest::error::InputLocation;

use crate::expr::ParseError;

/// Renders a parse error to stderr with a caret over the offending range of
/// the expression text.
pub fn report_parse_error(name: &str, src: &str, err: &ParseError) {
    let range = match err.location {
        // Widen a point location over the character under it.
        InputLocation::Pos(pos) => {
            let width = src[pos..].chars().next().map_or(0, char::len_utf8);
            pos..pos + width
        }
        InputLocation::Span((start, end)) => start..end,
    };

    let diagnostic = Diagnostic::<()>::error()
        .with_message(format!("invalid {name}"))
        .with_labels(vec![
            Label::primary((), range).with_message(err.variant.message())
        ]);

    let choice = if io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    let file = SimpleFile::new(name, src);
    let writer = StandardStream::stderr(choice);

    term::emit(&mut writer.lock(), &Config::default(), &file, &diagnostic)
        .expect("diagnostics render to stderr");
}
