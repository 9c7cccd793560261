//! Plain-text export through the sequential read cursor

use crate::slice::SliceView;
use crate::stats::NO_DATA;
use std::io::{self, Write};

/// Write one `time sample` line per sample of `view`
///
/// Times are printed with millisecond precision; gaps are written as `NaN`.
/// The cursor is rewound before and after writing. Returns the number of
/// lines written.
pub fn write_text<W: Write>(view: &mut SliceView<'_>, writer: &mut W) -> io::Result<usize> {
    view.reset();
    let mut lines = 0;
    loop {
        let time = view.cursor_time();
        let Some(sample) = view.next() else {
            break;
        };
        if sample == NO_DATA {
            writeln!(writer, "{time:.3} NaN")?;
        } else {
            writeln!(writer, "{time:.3} {sample}")?;
        }
        lines += 1;
    }
    view.reset();
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SampleBuffer;

    #[test]
    fn test_write_text() {
        let buffer = SampleBuffer::new(vec![5, NO_DATA, -3], 100.0, 4.0);
        let mut view = buffer.view();
        let mut out = Vec::new();
        let lines = write_text(&mut view, &mut out).unwrap();
        assert_eq!(lines, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "100.000 5\n100.250 NaN\n100.500 -3\n"
        );
        assert!(view.has_next());
    }

    #[test]
    fn test_write_text_respects_bounds() {
        let buffer = SampleBuffer::new((0..10).collect(), 0.0, 1.0);
        let mut view = buffer.view();
        view.set_bounds(8, 10);
        let mut out = Vec::new();
        write_text(&mut view, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "8.000 8\n9.000 9\n");
    }
}
