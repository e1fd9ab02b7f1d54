//! Call-site capture
//!
//! Every node records where it was built. Frames are resolved with the
//! `backtrace` crate and kept oldest-caller-last: frame 0 is the code that
//! called the public constructor.

use backtrace::Symbol;
use serde::{Serialize, Serializer};
use std::path::Path;

/// Prefix shared by every function defined in this crate
const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Frames examined for the first errchain frame before giving up
const MAX_MACHINERY_FRAMES: usize = 32;

const DEFAULT_CAPACITY: usize = 16;

/// A single resolved stack frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Source file, trimmed to start at the owning crate when possible
    pub file: String,
    /// Line number, 0 when unknown
    pub line: u32,
    /// Demangled function path without the symbol hash
    pub function: String,
}

impl Frame {
    fn unresolved() -> Self {
        Self {
            file: String::new(),
            line: 0,
            function: String::new(),
        }
    }

    /// `file:line:function`
    pub fn summary(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.function)
    }
}

/// The frames captured when an error was created.
///
/// `output_count` bounds how many of them are serialized. It starts at the
/// number of captured frames and can be moved anywhere in `[0, len]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerInfo {
    frames: Vec<Frame>,
    output_count: usize,
}

impl CallerInfo {
    /// Capture up to `max_frames` frames, starting `skip` frames above the
    /// first caller outside of errchain.
    ///
    /// The stack is walked lazily and symbols are only resolved until enough
    /// frames have been kept, so deep stacks cost no more than shallow ones.
    pub fn capture(skip: usize, max_frames: usize) -> Self {
        if max_frames == 0 {
            return Self::default();
        }

        let mut filter = FrameFilter::new(skip, max_frames);
        backtrace::trace(|frame| {
            let mut symbols = Vec::new();
            backtrace::resolve_frame(frame, |symbol| symbols.push(resolve_symbol(symbol)));
            if symbols.is_empty() {
                return filter.offer(Frame::unresolved());
            }
            symbols.into_iter().all(|symbol| filter.offer(symbol))
        });

        let frames = filter.finish();
        if frames.is_empty() {
            tracing::debug!("no symbol information available, caller info left empty");
        }
        Self::from_frames(frames)
    }

    /// Build from already resolved frames
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        let output_count = frames.len();
        Self {
            frames,
            output_count,
        }
    }

    /// All captured frames
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of captured frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if nothing was captured
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames emitted by serialization
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Set how many frames serialization emits, clamped to `[0, len]`
    pub fn set_output_depth(&mut self, n: usize) {
        self.output_count = n.min(self.frames.len());
    }

    /// The frames a serialization emits, at an explicit depth or at the
    /// stored output count.
    pub fn emitted(&self, depth: Option<usize>) -> &[Frame] {
        let count = depth.unwrap_or(self.output_count).min(self.frames.len());
        &self.frames[..count]
    }

    /// `file:line:function` of frame 0, or an empty string
    pub fn head_summary(&self) -> String {
        self.frames.first().map(Frame::summary).unwrap_or_default()
    }
}

impl Serialize for CallerInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.emitted(None).serialize(serializer)
    }
}

fn resolve_symbol(symbol: &Symbol) -> Frame {
    Frame {
        file: symbol
            .filename()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_default(),
        line: symbol.lineno().unwrap_or(0),
        function: symbol
            .name()
            .map(|name| format!("{:#}", name))
            .unwrap_or_default(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Unwinder frames above the first errchain frame
    Machinery,
    /// Contiguous errchain frames
    Internal,
    /// Caller frames, subject to `skip` and `max_frames`
    External,
}

/// Selects frames as they are walked, innermost first.
///
/// Drops the capture machinery from the top of the stack, then applies
/// `skip` and `max_frames`. [`FrameFilter::offer`] returns `false` once no
/// further frame is needed.
struct FrameFilter {
    stage: Stage,
    machinery_seen: usize,
    skip: usize,
    max_frames: usize,
    frames: Vec<Frame>,
}

impl FrameFilter {
    fn new(skip: usize, max_frames: usize) -> Self {
        Self {
            stage: Stage::Machinery,
            machinery_seen: 0,
            skip,
            max_frames,
            frames: Vec::with_capacity(max_frames.min(DEFAULT_CAPACITY)),
        }
    }

    fn offer(&mut self, frame: Frame) -> bool {
        if self.stage == Stage::Machinery {
            if !is_internal(&frame.function) {
                self.machinery_seen += 1;
                return self.machinery_seen < MAX_MACHINERY_FRAMES;
            }
            self.stage = Stage::Internal;
        }
        if self.stage == Stage::Internal {
            if is_internal(&frame.function) {
                return true;
            }
            self.stage = Stage::External;
        }
        if self.skip > 0 {
            self.skip -= 1;
            return true;
        }

        self.frames.push(Frame {
            file: trim_path(&frame.file, &frame.function),
            ..frame
        });
        self.frames.len() < self.max_frames
    }

    fn finish(self) -> Vec<Frame> {
        self.frames
    }
}

/// Functions of this crate, except its own tests
fn is_internal(function: &str) -> bool {
    if function.contains("::tests::") {
        return false;
    }
    function.trim_start_matches('<').starts_with(CRATE_PREFIX)
        || function.contains(&format!(" as {}", CRATE_PREFIX))
}

/// Make `file` relative to the crate owning `function`.
///
/// The crate name is looked up as a path component of `file`, either exactly
/// or followed by a registry version (`name-1.2.3`). When it does not appear
/// (relocated or vendored sources) this falls back to the parent directory
/// plus the file name. Display only: the result may be imprecise.
pub(crate) fn trim_path(file: &str, function: &str) -> String {
    if let Some(krate) = crate_of(function) {
        let hyphenated = krate.replace('_', "-");
        for needle in [krate, hyphenated.as_str()] {
            if file.strip_prefix(needle).is_some_and(ends_component) {
                return file.to_string();
            }
            let slashed = format!("/{}", needle);
            for (index, _) in file.match_indices(&slashed) {
                if ends_component(&file[index + slashed.len()..]) {
                    return file[index + 1..].to_string();
                }
            }
        }
    }
    parent_and_file_name(file)
}

/// Whatever follows a crate name closes the path component
fn ends_component(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some('/') | Some('\\') => true,
        Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

fn crate_of(function: &str) -> Option<&str> {
    let name = function.trim_start_matches('<');
    name.find("::")
        .map(|index| &name[..index])
        .filter(|krate| !krate.is_empty())
}

fn parent_and_file_name(file: &str) -> String {
    let path = Path::new(file);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.parent().and_then(Path::file_name) {
        Some(parent) => format!("{}/{}", parent.to_string_lossy(), name),
        None => name,
    }
}
