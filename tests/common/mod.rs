#![allow(clippy::uninlined_format_args)]

use regvm::backends::{step, State, Step};
use regvm::{disasm, Regex};

/// Test that \p pattern fails to compile with default flags.
#[track_caller]
pub fn test_parse_fails(pattern: &str) {
    let res = Regex::new(pattern);
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);
}

/// Test that \p pattern fails to compile with flags.
#[track_caller]
pub fn test_parse_fails_flags(pattern: &str, flags: &str) {
    let res = Regex::with_flags(pattern, flags);
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);
}

/// The way a compiled program is driven.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Driver {
    /// Regex::is_match.
    Api,

    /// backends::step, one instruction at a time.
    Stepper,
}

/// A compiled regex which remembers a TestConfig.
#[derive(Debug, Clone)]
pub struct TestCompiledRegex {
    re: Regex,
    tc: TestConfig,
}

impl TestCompiledRegex {
    /// \return whether self matches \p input.
    pub fn is_match(&self, input: &str) -> bool {
        match self.tc.driver {
            Driver::Api => self.re.is_match(input),
            Driver::Stepper => {
                let prog = self.re.program();
                let bytes = input.as_bytes();
                let mut s = State::new();
                while s.pc < prog.len() && s.sp <= bytes.len() {
                    match step(prog, bytes, &mut s) {
                        Step::Continue => {}
                        Step::Accept => return true,
                        Step::Fail => return false,
                    }
                }
                false
            }
        }
    }

    /// Test that self matches \p input.
    #[track_caller]
    pub fn test_succeeds(&self, input: &str) {
        assert!(
            self.is_match(input),
            "Regex should have matched: {:?}, config {:?}\n{}",
            input,
            self.tc,
            self.disassembly()
        );
    }

    /// Test that self does not match \p input.
    #[track_caller]
    pub fn test_fails(&self, input: &str) {
        assert!(
            !self.is_match(input),
            "Regex should not have matched: {:?}, config {:?}\n{}",
            input,
            self.tc,
            self.disassembly()
        );
    }

    pub fn disassembly(&self) -> String {
        disasm::disassemble(self.re.program())
    }

    pub fn regex(&self) -> &Regex {
        &self.re
    }
}

/// Describes how a regex is driven in a test.
#[derive(Debug, Copy, Clone)]
pub struct TestConfig {
    pub driver: Driver,
}

impl TestConfig {
    /// Compile a pattern to a regex, with default flags.
    #[track_caller]
    pub fn compile(&self, pattern: &str) -> TestCompiledRegex {
        self.compilef(pattern, "")
    }

    /// Compile a pattern to a regex, with given flags.
    #[track_caller]
    pub fn compilef(&self, pattern: &str, flags_str: &str) -> TestCompiledRegex {
        let re = Regex::with_flags(pattern, flags_str);
        assert!(
            re.is_ok(),
            "Failed to parse! flags: {} pattern: {}, error: {}",
            flags_str,
            pattern,
            re.unwrap_err()
        );
        TestCompiledRegex {
            re: re.unwrap(),
            tc: *self,
        }
    }
}

/// Invoke \p F with each test config, in turn.
pub fn test_with_configs<F>(func: F)
where
    F: Fn(TestConfig),
{
    func(TestConfig {
        driver: Driver::Api,
    });
    func(TestConfig {
        driver: Driver::Stepper,
    });
}
