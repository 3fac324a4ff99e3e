#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

//! Text report parsers for the profilers usually pointed at the workload: Valgrind
//! memcheck, callgrind and cachegrind, and gperftools `pprof --text`.

use anyhow::{Context, Result as AnyResult};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::annotation::Annotation;

pub const WORKSPACE_PREFIX: &str = "/workspace/";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    Leak { category: String, bytes: u64, blocks: u64 },
    LeakSite { file: String, line: u32 },
    CpuHotspot { function: String, line: u32, instructions: u64 },
    CacheMisses { i1: u64, ll: u64 },
    CacheHotspot { function: String, file: String, line: u32 },
    /// `file` has the workspace prefix stripped when `in_workspace`; other rows still count
    /// as issues but carry no annotation.
    SampledHotspot { function: String, file: String, line: u32, samples: u64, in_workspace: bool },
}

impl Finding {
    pub fn annotation(&self) -> Option<Annotation> {
        let a = match self {
            Finding::Leak { category, bytes, blocks } => {
                Annotation::warning(format!("Valgrind {category}: {bytes} bytes in {blocks} blocks"))
            }
            Finding::LeakSite { file, line } => {
                Annotation::warning_at(file, *line, format!("Memory leak at {file}:{line}"))
            }
            Finding::CpuHotspot { function, line, instructions } => Annotation::warning(format!(
                "Callgrind CPU hotspot in {function}: {instructions} instructions at line {line}"
            )),
            Finding::CacheMisses { i1, ll } => {
                Annotation::warning(format!("Cache misses → I1: {i1}, LL: {ll}"))
            }
            Finding::CacheHotspot { function, file, line } => {
                Annotation::warning_at(file, *line, format!("Cache hotspot in {function}"))
            }
            Finding::SampledHotspot { in_workspace: false, .. } => return None,
            Finding::SampledHotspot { function, file, line, samples, .. } => Annotation::warning_at(
                file,
                *line,
                format!("CPU hotspot in {function}: {samples} calls"),
            ),
        };
        Some(a)
    }
}

// Inputs are digit runs from the patterns above; anything too wide saturates.
fn number(raw: &str) -> u64 {
    let digits = raw.replace(',', "");
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

fn line_no(raw: &str) -> u32 {
    u32::try_from(number(raw)).unwrap_or(u32::MAX)
}

pub fn parse_memcheck(text: &str) -> AnyResult<Vec<Finding>> {
    let leak = Regex::new(
        r"==\d+==\s+(definitely lost|indirectly lost|possibly lost):\s*([\d,]+)\s+bytes in ([\d,]+)\s+blocks",
    )
    .context("compile memcheck leak pattern")?;
    let frame = Regex::new(r"==\d+==\s+by 0x[0-9A-F]+: .*?\((.*?):(\d+)\)")
        .context("compile memcheck frame pattern")?;
    let mut out: Vec<Finding> = leak
        .captures_iter(text)
        .map(|c| Finding::Leak {
            category: c[1].to_string(),
            bytes: number(&c[2]),
            blocks: number(&c[3]),
        })
        .collect();
    out.extend(frame.captures_iter(text).map(|c| Finding::LeakSite {
        file: c[1].to_string(),
        line: line_no(&c[2]),
    }));
    Ok(out)
}

pub fn parse_callgrind(text: &str) -> AnyResult<Vec<Finding>> {
    // fn=<name> directly followed by "<line> <cost>"
    let re = Regex::new(r"fn=([^\n]+)\n(\d+)\s+(\d+)").context("compile callgrind pattern")?;
    Ok(re
        .captures_iter(text)
        .map(|c| Finding::CpuHotspot {
            function: c[1].to_string(),
            line: line_no(&c[2]),
            instructions: number(&c[3]),
        })
        .collect())
}

pub fn parse_cachegrind(text: &str, prefix: &str) -> AnyResult<Vec<Finding>> {
    let i1 = Regex::new(r"I1\s+misses:\s+([\d,]+)").context("compile I1 pattern")?;
    let ll = Regex::new(r"LL\s+misses:\s+([\d,]+)").context("compile LL pattern")?;
    let row = Regex::new(r"^\s*[\d,]+\s+[\d.]+%\s*[\d,]+\s+(.+?)\s+\((.*?):(\d+)\)")
        .context("compile cg_annotate row pattern")?;

    let mut out = Vec::new();
    let i1 = i1.captures(text).map(|c| number(&c[1]));
    let ll = ll.captures(text).map(|c| number(&c[1]));
    if i1.is_some() || ll.is_some() {
        out.push(Finding::CacheMisses { i1: i1.unwrap_or(0), ll: ll.unwrap_or(0) });
    }
    for line in text.lines() {
        let Some(c) = row.captures(line) else { continue };
        if let Some(file) = c[2].strip_prefix(prefix) {
            out.push(Finding::CacheHotspot {
                function: c[1].to_string(),
                file: file.to_string(),
                line: line_no(&c[3]),
            });
        }
    }
    Ok(out)
}

pub fn parse_gperftools(text: &str, prefix: &str) -> AnyResult<Vec<Finding>> {
    let re = Regex::new(
        r"(?m)^\s*(\d+)\s+[\d.]+%\s+[\d.]+%\s+(\d+)\s+[\d.]+%\s+(.+?)\s+\((.*?):(\d+)\)",
    )
    .context("compile pprof pattern")?;
    Ok(re
        .captures_iter(text)
        .map(|c| {
            let (file, in_workspace) = match c[4].strip_prefix(prefix) {
                Some(rel) => (rel.to_string(), true),
                None => (c[4].to_string(), false),
            };
            Finding::SampledHotspot {
                function: c[3].to_string(),
                file,
                line: line_no(&c[5]),
                samples: number(&c[1]),
                in_workspace,
            }
        })
        .collect())
}

#[derive(Clone, Debug)]
pub struct ProfilePaths {
    pub memcheck: PathBuf,
    pub callgrind: PathBuf,
    pub cachegrind: PathBuf,
    pub pprof: PathBuf,
}

/// `foo.out` is summarized by cg_annotate into `foo_summary.txt`; prefer that when present.
/// Without the raw report there is nothing to summarize, so a lone summary is ignored.
pub fn cachegrind_source(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }
    let summary = PathBuf::from(path.to_string_lossy().replace(".out", "_summary.txt"));
    if summary.exists() {
        Some(summary)
    } else {
        Some(path.to_path_buf())
    }
}

fn read_lossy(path: &Path) -> AnyResult<String> {
    let raw = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfileReport {
    pub findings: Vec<Finding>,
}

impl ProfileReport {
    /// Runs every parser whose input exists. Missing reports are skipped.
    pub fn collect(paths: &ProfilePaths, prefix: &str) -> AnyResult<Self> {
        let mut findings = Vec::new();
        if paths.memcheck.exists() {
            findings.extend(parse_memcheck(&read_lossy(&paths.memcheck)?)?);
        }
        if paths.callgrind.exists() {
            findings.extend(parse_callgrind(&read_lossy(&paths.callgrind)?)?);
        }
        if let Some(src) = cachegrind_source(&paths.cachegrind) {
            findings.extend(parse_cachegrind(&read_lossy(&src)?, prefix)?);
        }
        if paths.pprof.exists() {
            findings.extend(parse_gperftools(&read_lossy(&paths.pprof)?, prefix)?);
        }
        debug!(findings = findings.len(), "profile reports parsed");
        Ok(Self { findings })
    }

    pub fn has_issues(&self) -> bool {
        !self.findings.is_empty()
    }

    pub fn annotations(&self, binary: &str) -> Vec<Annotation> {
        let mut out = vec![Annotation::Group(format!("Profiling results for {binary}"))];
        out.extend(self.findings.iter().filter_map(Finding::annotation));
        if !self.has_issues() {
            out.push(Annotation::Notice(
                "No performance or memory issues detected".to_string(),
            ));
        }
        out.push(Annotation::EndGroup);
        out
    }
}
