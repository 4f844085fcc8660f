//! Unit tests for typed binding, sequence commits and failure policies.

use super::{ErrorHandling, FlagSet};
use crate::error::{BindError, ParseError};
use crate::value::Value;
use crate::{Bindable, FlagScalar};
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use std::fmt::Debug;
use test_helpers::{OutputBuffer, argv};

fn quiet_set<'a>() -> FlagSet<'a> {
    let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
    flags.set_output(OutputBuffer::default());
    flags
}

fn parse_scalar<T>(mut dest: T, args: &[&str]) -> Result<T>
where
    T: Bindable,
{
    let mut flags = quiet_set();
    flags.bind(&mut dest, "param", "use of param")?;
    flags.parse(argv(args.iter().copied()))?;
    drop(flags);
    Ok(dest)
}

#[rstest]
#[case::int32(&["-param", "-1"], 0_i32, -1_i32)]
#[case::radix(&["-param=0x1f"], 0_i32, 31_i32)]
fn binds_signed_scalars(#[case] args: &[&str], #[case] start: i32, #[case] expected: i32) -> Result<()> {
    let got = parse_scalar(start, args)?;
    ensure!(got == expected, "got {got}, expected {expected}");
    Ok(())
}

fn check_scalar<T>(start: T, args: &[&str], expected: &T) -> Result<()>
where
    T: Bindable + PartialEq + Debug,
{
    let got = parse_scalar(start, args)?;
    ensure!(&got == expected, "got {got:?}, expected {expected:?}");
    Ok(())
}

#[rstest]
fn binds_every_scalar_type() -> Result<()> {
    check_scalar(0_i64, &["-param", "-4"], &-4_i64)?;
    check_scalar(0_u32, &["-param", "2"], &2_u32)?;
    check_scalar(0_u64, &["-param", "3"], &3_u64)?;
    check_scalar(0.0_f64, &["-param", "1.2"], &1.2_f64)?;
    check_scalar(String::new(), &["-param", "d3d"], &"d3d".to_owned())?;
    check_scalar(false, &["-param"], &true)?;
    Ok(())
}

#[rstest]
fn later_scalar_occurrence_wins() -> Result<()> {
    let got = parse_scalar(0_i32, &["-param", "1", "-param", "2"])?;
    ensure!(got == 2, "got {got}");
    Ok(())
}

fn check_sequence<T>(args: &[&str], expected: &[T]) -> Result<()>
where
    T: FlagScalar + PartialEq + Debug,
    Vec<T>: Bindable,
{
    let got = parse_scalar(Vec::<T>::new(), args)?;
    ensure!(got == expected, "got {got:?}, expected {expected:?}");
    Ok(())
}

#[rstest]
fn binds_every_sequence_type() -> Result<()> {
    check_sequence(&["-param", "-1", "-param", "-2"], &[-1_i32, -2])?;
    check_sequence(&["-param", "-4", "-param", "-5"], &[-4_i64, -5])?;
    check_sequence(&["-param", "2", "-param", "3"], &[2_u32, 3])?;
    check_sequence(&["-param", "3", "-param", "4"], &[3_u64, 4])?;
    check_sequence(&["-param", "1.2", "-param", "3.4"], &[1.2_f64, 3.4])?;
    check_sequence(
        &["-param", "d3d", "-param", "b3f"],
        &["d3d".to_owned(), "b3f".to_owned()],
    )?;
    Ok(())
}

#[rstest]
fn delimited_sequence_splits_each_occurrence() -> Result<()> {
    let mut ips: Vec<String> = Vec::new();
    let mut nums: Vec<f64> = Vec::new();
    let mut flags = quiet_set();
    flags.bind_with_delimiter(&mut ips, "ip", "IP address", ",")?;
    flags.bind_with_delimiter(&mut nums, "num", "Number", ",")?;
    flags.parse([
        "-ip", "127.0.0.1", "-ip", "127.0.0.2,127.0.0.3", "-num", "1.5", "-num", "2.6,3.7",
    ])?;
    drop(flags);
    ensure!(ips == ["127.0.0.1", "127.0.0.2", "127.0.0.3"], "ips: {ips:?}");
    ensure!(nums == [1.5, 2.6, 3.7], "nums: {nums:?}");
    Ok(())
}

#[rstest]
fn sequence_occurrences_replace_prefilled_defaults() -> Result<()> {
    let mut ports = vec![80_u32];
    let mut flags = quiet_set();
    flags.bind(&mut ports, "port", "ports")?;
    let info = flags.lookup("port").ok_or_else(|| anyhow!("port registered"))?;
    ensure!(info.default_text == "[80]", "default: {}", info.default_text);
    flags.parse(["-port", "8080", "-port", "8443"])?;
    drop(flags);
    ensure!(ports == [8080, 8443], "ports: {ports:?}");
    Ok(())
}

#[rstest]
fn absent_flags_keep_their_defaults() -> Result<()> {
    let mut ip = String::new();
    let mut default_ip = "127.0.0.1".to_owned();
    let mut ips = vec!["10.0.0.1".to_owned()];
    let mut count = 0_i32;
    let mut flags = quiet_set();
    flags.bind(&mut ip, "ip", "IP address (string)")?;
    flags.bind(&mut default_ip, "default_ip", "IP address with default value")?;
    flags.bind(&mut ips, "ips", "IP addresses")?;
    flags.bind(&mut count, "count", "Count (int)")?;
    flags.parse(["-ip", "127.0.0.2", "-count", "2"])?;
    ensure!(flags.n_flag() == 2, "n_flag: {}", flags.n_flag());
    drop(flags);
    ensure!(ip == "127.0.0.2", "ip: {ip}");
    ensure!(default_ip == "127.0.0.1", "default_ip: {default_ip}");
    ensure!(ips == ["10.0.0.1"], "ips: {ips:?}");
    ensure!(count == 2, "count: {count}");
    Ok(())
}

#[rstest]
fn failed_parse_leaves_sequences_untouched() -> Result<()> {
    let mut nums = vec![7_i64];
    let mut flags = quiet_set();
    flags.bind_with_delimiter(&mut nums, "num", "numbers", ",")?;
    let err = flags.parse(["-num", "1,2", "-num", "3,x"]).err();
    ensure!(
        matches!(&err, Some(ParseError::InvalidValue { name, .. }) if name == "num"),
        "unexpected: {err:?}"
    );
    drop(flags);
    ensure!(nums == [7], "nums: {nums:?}");
    Ok(())
}

#[rstest]
fn failed_parse_does_not_leak_into_next_parse() -> Result<()> {
    let mut nums = vec![7_i64];
    let mut flags = quiet_set();
    flags.bind_with_delimiter(&mut nums, "num", "numbers", ",")?;
    ensure!(
        flags.parse(["-num", "1,2", "-num", "x"]).is_err(),
        "x is not an integer"
    );
    flags.parse(["-num", "9"])?;
    drop(flags);
    ensure!(nums == [9], "nums: {nums:?}");
    Ok(())
}

#[rstest]
fn failed_parse_keeps_values_set_beforehand() -> Result<()> {
    let mut hosts: Vec<String> = Vec::new();
    let mut flags = quiet_set();
    flags.bind_with_delimiter(&mut hosts, "host", "hosts", ",")?;
    flags.set("host", "a")?;
    ensure!(flags.parse(["-host", "b", "-bogus"]).is_err(), "-bogus is undefined");
    flags.parse(["-host", "c"])?;
    drop(flags);
    ensure!(hosts == ["a", "c"], "hosts: {hosts:?}");
    Ok(())
}

#[rstest]
fn errors_are_written_with_usage() -> Result<()> {
    let output = OutputBuffer::default();
    let mut count = 0_i32;
    let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
    flags.set_output(output.clone());
    flags.bind(&mut count, "count", "how many")?;
    let err = flags.parse(["-bogus"]).err();
    ensure!(
        err == Some(ParseError::Undefined { name: "bogus".into() }),
        "unexpected: {err:?}"
    );
    ensure!(
        output.contents()
            == "flag provided but not defined: -bogus\nUsage of test:\n  -count int\n    \thow many\n",
        "output: {}",
        output.contents()
    );
    Ok(())
}

#[rstest]
#[should_panic(expected = "flag provided but not defined: -bogus")]
fn panic_policy_panics_with_message() {
    let mut flags = FlagSet::new("test", ErrorHandling::PanicOnError);
    flags.set_output(OutputBuffer::default());
    assert!(flags.parse(["-bogus"]).is_err());
}

#[rstest]
fn duplicate_names_are_rejected() -> Result<()> {
    let (mut first, mut second) = (0_i32, Vec::<String>::new());
    let mut flags = quiet_set();
    flags.bind(&mut first, "n", "")?;
    let err = flags.bind(&mut second, "n", "");
    ensure!(
        err == Err(BindError::DuplicateName { set: "test".into(), name: "n".into() }),
        "unexpected: {err:?}"
    );
    Ok(())
}

#[rstest]
fn bind_any_accepts_supported_types() -> Result<()> {
    let mut ports: Vec<u64> = Vec::new();
    let mut flags = quiet_set();
    flags.bind_any(&mut ports, "port", "ports", "+")?;
    flags.parse(["-port=1+2"])?;
    drop(flags);
    ensure!(ports == [1, 2], "ports: {ports:?}");
    Ok(())
}

#[rstest]
fn bind_any_rejects_unsupported_types() -> Result<()> {
    let mut small = 0_u8;
    let mut flags = quiet_set();
    let err = flags.bind_any(&mut small, "small", "", "");
    ensure!(
        err == Err(BindError::UnsupportedType { name: "small".into(), type_name: "u8" }),
        "unexpected: {err:?}"
    );
    ensure!(flags.lookup("small").is_none(), "nothing should be registered");
    Ok(())
}

#[rstest]
fn leftover_arguments_are_exposed() -> Result<()> {
    let mut verbose = false;
    let mut flags = quiet_set();
    flags.bind(&mut verbose, "v", "verbose")?;
    ensure!(!flags.parsed(), "not parsed yet");
    flags.parse(["-v", "in.txt", "out.txt"])?;
    ensure!(flags.parsed(), "parsed");
    ensure!(flags.n_arg() == 2, "n_arg: {}", flags.n_arg());
    ensure!(flags.arg(1) == "out.txt", "arg(1): {}", flags.arg(1));
    ensure!(flags.arg(5).is_empty(), "out of range arg should be empty");
    Ok(())
}

#[rstest]
fn programmatic_set_on_sequence_commits_on_next_parse() -> Result<()> {
    let mut hosts: Vec<String> = Vec::new();
    let mut flags = quiet_set();
    flags.bind_with_delimiter(&mut hosts, "host", "hosts", ",")?;
    flags.set("host", "a,b")?;
    flags.parse(["-host", "c"])?;
    drop(flags);
    ensure!(hosts == ["a", "b", "c"], "hosts: {hosts:?}");
    Ok(())
}

#[rstest]
fn visit_reports_only_set_flags() -> Result<()> {
    let (mut a, mut b) = (0_i32, 0_i32);
    let mut flags = quiet_set();
    flags.bind(&mut a, "a", "")?;
    flags.bind(&mut b, "b", "")?;
    flags.parse(["-b", "1"])?;
    let mut seen = Vec::new();
    flags.visit(|info| seen.push(info.name.clone()));
    let mut all = Vec::new();
    flags.visit_all(|info| all.push(info.name.clone()));
    ensure!(seen == ["b"], "seen: {seen:?}");
    ensure!(all == ["a", "b"], "all: {all:?}");
    Ok(())
}

struct Level<'a>(&'a mut u8);

impl Value for Level<'_> {
    fn set(&mut self, raw: &str) -> Result<(), crate::ConversionError> {
        *self.0 = raw.len().try_into().map_err(|_| {
            crate::ConversionError::custom("level", raw, "too long")
        })?;
        Ok(())
    }

    fn render(&self) -> String {
        self.0.to_string()
    }
}

#[rstest]
fn custom_values_register_with_var() -> Result<()> {
    let mut level = 1_u8;
    let mut flags = quiet_set();
    flags.var(Level(&mut level), "level", "verbosity")?;
    let info = flags.lookup("level").ok_or_else(|| anyhow!("level registered"))?;
    ensure!(info.type_name == "value", "type: {}", info.type_name);
    ensure!(info.default_text == "1", "default: {}", info.default_text);
    flags.parse(["-level", "vvv"])?;
    drop(flags);
    ensure!(level == 3, "level: {level}");
    Ok(())
}

#[rstest]
fn wide_integers_share_the_narrow_placeholders() -> Result<()> {
    let output = OutputBuffer::default();
    let (mut offset, mut size) = (0_i64, 0_u64);
    let mut flags = FlagSet::new("test", ErrorHandling::ContinueOnError);
    flags.set_output(output.clone());
    flags.bind(&mut offset, "offset", "start position")?;
    flags.bind(&mut size, "size", "bytes to read")?;
    flags.print_defaults()?;
    let expected = concat!(
        "  -offset int\n    \tstart position\n",
        "  -size uint\n    \tbytes to read\n",
    );
    ensure!(output.contents() == expected, "defaults:\n{}", output.contents());
    Ok(())
}
