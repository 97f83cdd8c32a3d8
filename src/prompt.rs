//! Line-oriented questions on a terminal.

use std::io::{BufRead, Write};

use anyhow::bail;

use crate::options::Choice;

pub struct Prompter<R, W> {
    input: R,
    output: W,
    assume_defaults: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter {
            input,
            output,
            assume_defaults: false,
        }
    }

    /// Answer every question with its default instead of reading input.
    pub fn assume_defaults(mut self, yes: bool) -> Self {
        self.assume_defaults = yes;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prints `question` and reads one trimmed line. `None` at end of input.
    fn ask(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        writeln!(self.output, "{question}")?;
        self.output.flush()?;

        if self.assume_defaults {
            return Ok(Some(String::new()));
        }

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks for a free-form value. An empty answer takes `default`; with no
    /// default an answer is required.
    pub fn ask_string(&mut self, question: &str, default: Option<&str>) -> anyhow::Result<String> {
        let question = match default {
            Some(d) => format!("{question} (default: {d}):"),
            None => format!("{question}:"),
        };

        loop {
            let answer = self.ask(&question)?;
            match (answer, default) {
                (Some(a), _) if !a.is_empty() => return Ok(a),
                (Some(_), Some(d)) | (None, Some(d)) => return Ok(d.to_string()),
                (None, None) => bail!("no answer given for: {question}"),
                (Some(_), None) if self.assume_defaults => {
                    bail!("cannot answer `{question}` without a default")
                }
                (Some(_), None) => continue,
            }
        }
    }

    /// Asks for a number. Empty, unparsable and missing answers are `None`.
    pub fn ask_number(&mut self, question: &str) -> anyhow::Result<Option<u32>> {
        Ok(self.ask(question)?.and_then(|a| a.parse().ok()))
    }

    /// Offers every variant of `T` by index. Anything but a valid index
    /// selects `default`.
    pub fn choose<T: Choice>(&mut self, title: &str, default: T) -> anyhow::Result<T> {
        let mut question = format!("{title} (default: {default}):");
        for (i, variant) in T::variants().iter().enumerate() {
            question.push_str(&format!("\n\t{i}: {variant}"));
        }

        let picked = self
            .ask_number(&question)?
            .and_then(|i| T::variants().get(i as usize).copied());
        Ok(picked.unwrap_or(default))
    }

    /// Like [`Prompter::choose`], with index 0 meaning "leave unset".
    pub fn choose_optional<T: Choice>(
        &mut self,
        title: &str,
        default: Option<T>,
    ) -> anyhow::Result<Option<T>> {
        let default_text = default.map(|d| d.to_string()).unwrap_or_else(|| "unset".into());
        let mut question = format!("{title} (default: {default_text}):\n\t0: unset");
        for (i, variant) in T::variants().iter().enumerate() {
            question.push_str(&format!("\n\t{}: {variant}", i + 1));
        }

        Ok(match self.ask_number(&question)? {
            Some(0) => None,
            Some(i) => T::variants()
                .get(i as usize - 1)
                .copied()
                .map(Some)
                .unwrap_or(default),
            None => default,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::options::{Abi, Neon};

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn choose_by_index() {
        let mut p = prompter("2\n");
        assert_eq!(p.choose("ANDROID_ABI", Abi::ArmeabiV7a).unwrap(), Abi::Arm64V8a);
        let shown = String::from_utf8(p.into_output()).unwrap();
        assert!(shown.contains("ANDROID_ABI (default: armeabi-v7a):"));
        assert!(shown.contains("\t1: armeabi-v7a with NEON"));
        assert!(shown.contains("\t4: x86_64"));
    }

    #[test]
    fn choose_falls_back_to_default() {
        for input in ["\n", "abc\n", "17\n", ""] {
            let mut p = prompter(input);
            assert_eq!(p.choose("ANDROID_ABI", Abi::X86).unwrap(), Abi::X86, "{input:?}");
        }
    }

    #[test]
    fn optional_choice() {
        assert_eq!(prompter("1\n").choose_optional("NEON", None).unwrap(), Some(Neon::True));
        assert_eq!(prompter("2\n").choose_optional("NEON", None).unwrap(), Some(Neon::False));
        assert_eq!(prompter("0\n").choose_optional("NEON", Some(Neon::True)).unwrap(), None::<Neon>);
        assert_eq!(prompter("\n").choose_optional("NEON", Some(Neon::False)).unwrap(), Some(Neon::False));
        assert_eq!(prompter("9\n").choose_optional::<Neon>("NEON", None).unwrap(), None);
    }

    #[test]
    fn string_defaults_and_required_answers() {
        assert_eq!(prompter("\n").ask_string("Dir", Some("out")).unwrap(), "out");
        assert_eq!(prompter("  build  \n").ask_string("Dir", Some("out")).unwrap(), "build");
        assert_eq!(prompter("\n\n/opt/sdk\n").ask_string("SDK", None).unwrap(), "/opt/sdk");
        assert!(prompter("").ask_string("SDK", None).is_err());
    }

    #[test]
    fn assume_defaults_never_reads() {
        let mut p = prompter("3\n").assume_defaults(true);
        assert_eq!(p.choose("ANDROID_ABI", Abi::ArmeabiV7a).unwrap(), Abi::ArmeabiV7a);
        assert_eq!(p.ask_string("Dir", Some("out")).unwrap(), "out");
        assert!(p.ask_string("SDK", None).is_err());
    }
}
