//! Minimal ROOT file writer for tests.
//!
//! Produces uncompressed small-format files (32-bit seeks) holding nested
//! `TDirectoryFile`s and TH1F/TH1D objects, laid out the way ROOT 6 writes
//! them closely enough for this crate's reader. Enabled by the `fixtures`
//! feature so downstream crates can build inputs for their own tests.

use std::path::Path;

use crate::rbuffer::BYTE_COUNT_MASK;

const FILE_VERSION: u32 = 62206;
const BEGIN: usize = 100;
const KEY_VERSION: u16 = 4;
const DIR_VERSION: u16 = 5;
const TH1_VERSION: u16 = 8;
const TAXIS_VERSION: u16 = 10;
const KOBJECT_BITS: u32 = 0x0300_0000;

/// Contents of one histogram to write.
#[derive(Debug, Clone)]
pub struct HistSpec {
    /// Object name (also used as the key name when added to a file).
    pub name: String,
    /// Object title.
    pub title: String,
    /// Lower x edge.
    pub x_min: f64,
    /// Upper x edge.
    pub x_max: f64,
    /// Explicit edges for variable binning.
    pub edges: Option<Vec<f64>>,
    /// In-range bin contents.
    pub contents: Vec<f64>,
    /// In-range sum of squared weights.
    pub sumw2: Option<Vec<f64>>,
    /// Stored `fEntries`.
    pub entries: f64,
}

impl HistSpec {
    /// Uniformly binned histogram over `[x_min, x_max)`.
    pub fn uniform(name: &str, contents: Vec<f64>, x_min: f64, x_max: f64) -> Self {
        let entries = contents.iter().sum();
        Self {
            name: name.to_string(),
            title: name.to_string(),
            x_min,
            x_max,
            edges: None,
            contents,
            sumw2: None,
            entries,
        }
    }

    /// Attach per-bin sum of squared weights.
    pub fn with_sumw2(mut self, sumw2: Vec<f64>) -> Self {
        self.sumw2 = Some(sumw2);
        self
    }

    /// Switch to variable binning with these `n + 1` edges.
    pub fn with_edges(mut self, edges: Vec<f64>) -> Self {
        if let (Some(&lo), Some(&hi)) = (edges.first(), edges.last()) {
            self.x_min = lo;
            self.x_max = hi;
        }
        self.edges = Some(edges);
        self
    }
}

#[derive(Debug, Default)]
struct DirNode {
    entries: Vec<Entry>,
}

#[derive(Debug)]
enum Entry {
    Dir { name: String, node: DirNode },
    Object { name: String, class_name: String, cycle: u16, payload: Vec<u8> },
}

/// An in-memory ROOT file under construction.
///
/// Objects are added by slash-separated path; intermediate directories are
/// created on first use and keep insertion order.
#[derive(Debug, Default)]
pub struct FixtureFile {
    root: DirNode,
}

impl FixtureFile {
    /// Empty file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a TH1F at `path`.
    pub fn add_th1f(&mut self, path: &str, spec: HistSpec) -> &mut Self {
        self.add_object(path, "TH1F", encode_th1(&spec, false))
    }

    /// Add a TH1D at `path`.
    pub fn add_th1d(&mut self, path: &str, spec: HistSpec) -> &mut Self {
        self.add_object(path, "TH1D", encode_th1(&spec, true))
    }

    /// Add an arbitrary object with cycle 1.
    pub fn add_object(&mut self, path: &str, class_name: &str, payload: Vec<u8>) -> &mut Self {
        self.add_object_cycle(path, class_name, 1, payload)
    }

    /// Add an arbitrary object under an explicit cycle number.
    pub fn add_object_cycle(
        &mut self,
        path: &str,
        class_name: &str,
        cycle: u16,
        payload: Vec<u8>,
    ) -> &mut Self {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, dirs)) = parts.split_last() else {
            return self;
        };
        let mut node = &mut self.root;
        for &dir in dirs {
            node = node.subdir(dir);
        }
        node.entries.push(Entry::Object {
            name: leaf.to_string(),
            class_name: class_name.to_string(),
            cycle,
            payload,
        });
        self
    }

    /// Add an empty directory at `path`.
    pub fn add_dir(&mut self, path: &str) -> &mut Self {
        let mut node = &mut self.root;
        for dir in path.split('/').filter(|s| !s.is_empty()) {
            node = node.subdir(dir);
        }
        self
    }

    /// Serialize the whole file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; BEGIN];

        // TFile key: header plus file name and title; the top directory
        // record follows it.
        let file_key = encode_key_header("TFile", "fixture.root", "", 0, BEGIN as u32, 1);
        out.extend_from_slice(&file_key);
        put_string(&mut out, "fixture.root");
        put_string(&mut out, "");
        let nbytes_name = out.len() - BEGIN;
        let top_dir_at = out.len();
        out.extend_from_slice(&encode_dir_record(0, 0));

        let (seek_keys, nbytes_keys) = write_dir(&mut out, &self.root, "fixture.root");
        out[top_dir_at..top_dir_at + DIR_RECORD_LEN]
            .copy_from_slice(&encode_dir_record(seek_keys, nbytes_keys));

        let end = out.len() as u32;
        let mut header = Vec::with_capacity(BEGIN);
        header.extend_from_slice(b"root");
        header.extend_from_slice(&FILE_VERSION.to_be_bytes());
        header.extend_from_slice(&(BEGIN as u32).to_be_bytes());
        header.extend_from_slice(&end.to_be_bytes()); // fEND
        header.extend_from_slice(&end.to_be_bytes()); // fSeekFree
        header.extend_from_slice(&0u32.to_be_bytes()); // fNbytesFree
        header.extend_from_slice(&0u32.to_be_bytes()); // nfree
        header.extend_from_slice(&(nbytes_name as u32).to_be_bytes());
        header.push(4); // fUnits
        header.extend_from_slice(&0u32.to_be_bytes()); // fCompress
        header.extend_from_slice(&0u32.to_be_bytes()); // fSeekInfo
        header.extend_from_slice(&0u32.to_be_bytes()); // fNbytesInfo
        out[..header.len()].copy_from_slice(&header);
        out
    }

    /// Serialize and write to disk.
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_bytes())
    }
}

impl DirNode {
    fn subdir(&mut self, name: &str) -> &mut DirNode {
        let idx = self
            .entries
            .iter()
            .position(|e| matches!(e, Entry::Dir { name: n, .. } if n == name));
        let idx = match idx {
            Some(i) => i,
            None => {
                self.entries.push(Entry::Dir { name: name.to_string(), node: DirNode::default() });
                self.entries.len() - 1
            }
        };
        match &mut self.entries[idx] {
            Entry::Dir { node, .. } => node,
            Entry::Object { .. } => unreachable!("position() only matches directories"),
        }
    }
}

/// version + 2 datimes + nbytes_keys + nbytes_name + 3 small seeks.
const DIR_RECORD_LEN: usize = 2 + 4 + 4 + 4 + 4 + 4 + 4 + 4;

fn encode_dir_record(seek_keys: u32, nbytes_keys: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(DIR_RECORD_LEN);
    out.extend_from_slice(&DIR_VERSION.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // fDatimeC
    out.extend_from_slice(&0u32.to_be_bytes()); // fDatimeM
    out.extend_from_slice(&nbytes_keys.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // fNbytesName
    out.extend_from_slice(&0u32.to_be_bytes()); // fSeekDir
    out.extend_from_slice(&0u32.to_be_bytes()); // fSeekParent
    out.extend_from_slice(&seek_keys.to_be_bytes());
    out
}

/// Write a directory's children and key list; returns (seek_keys, nbytes_keys).
fn write_dir(out: &mut Vec<u8>, node: &DirNode, dir_name: &str) -> (u32, u32) {
    let mut headers: Vec<Vec<u8>> = Vec::with_capacity(node.entries.len());
    for entry in &node.entries {
        let header = match entry {
            Entry::Dir { name, node } => {
                let (seek_keys, nbytes_keys) = write_dir(out, node, name);
                let payload = encode_dir_record(seek_keys, nbytes_keys);
                write_record(out, "TDirectoryFile", name, 1, &payload)
            }
            Entry::Object { name, class_name, cycle, payload } => {
                write_record(out, class_name, name, *cycle, payload)
            }
        };
        headers.push(header);
    }

    let body_len: usize = 4 + headers.iter().map(Vec::len).sum::<usize>();
    let seek_keys = out.len() as u32;
    let list_key = encode_key_header("TDirectory", dir_name, "", body_len as u32, seek_keys, 1);
    let nbytes_keys = (list_key.len() + body_len) as u32;
    out.extend_from_slice(&list_key);
    out.extend_from_slice(&(headers.len() as u32).to_be_bytes());
    for h in &headers {
        out.extend_from_slice(h);
    }
    (seek_keys, nbytes_keys)
}

/// Append key header and payload at the current end; returns the header.
fn write_record(out: &mut Vec<u8>, class_name: &str, name: &str, cycle: u16, payload: &[u8]) -> Vec<u8> {
    let seek = out.len() as u32;
    let header = encode_key_header(class_name, name, "", payload.len() as u32, seek, cycle);
    out.extend_from_slice(&header);
    out.extend_from_slice(payload);
    header
}

fn encode_key_header(class_name: &str, name: &str, title: &str, obj_len: u32, seek: u32, cycle: u16) -> Vec<u8> {
    let mut strings = Vec::new();
    put_string(&mut strings, class_name);
    put_string(&mut strings, name);
    put_string(&mut strings, title);
    let key_len = 4 + 2 + 4 + 4 + 2 + 2 + 4 + 4 + strings.len();

    let mut out = Vec::with_capacity(key_len);
    out.extend_from_slice(&(key_len as u32 + obj_len).to_be_bytes());
    out.extend_from_slice(&KEY_VERSION.to_be_bytes());
    out.extend_from_slice(&obj_len.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // fDatime
    out.extend_from_slice(&(key_len as u16).to_be_bytes());
    out.extend_from_slice(&cycle.to_be_bytes());
    out.extend_from_slice(&seek.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // fSeekPdir
    out.extend_from_slice(&strings);
    out
}

fn put_string(out: &mut Vec<u8>, s: &str) {
    if s.len() < 255 {
        out.push(s.len() as u8);
    } else {
        out.push(255);
        out.extend_from_slice(&(s.len() as u32).to_be_bytes());
    }
    out.extend_from_slice(s.as_bytes());
}

/// Write `version` with a byte count, then whatever `body` appends.
fn versioned(out: &mut Vec<u8>, version: u16, body: impl FnOnce(&mut Vec<u8>)) {
    let start = out.len();
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&version.to_be_bytes());
    body(out);
    let count = (out.len() - start - 4) as u32;
    out[start..start + 4].copy_from_slice(&(count | BYTE_COUNT_MASK).to_be_bytes());
}

fn put_tnamed(out: &mut Vec<u8>, name: &str, title: &str) {
    versioned(out, 1, |o| {
        o.extend_from_slice(&1u16.to_be_bytes()); // TObject version
        o.extend_from_slice(&0u32.to_be_bytes()); // fUniqueID
        o.extend_from_slice(&KOBJECT_BITS.to_be_bytes());
        put_string(o, name);
        put_string(o, title);
    });
}

fn put_array_d(out: &mut Vec<u8>, values: &[f64]) {
    out.extend_from_slice(&(values.len() as u32).to_be_bytes());
    for v in values {
        out.extend_from_slice(&v.to_be_bytes());
    }
}

fn put_taxis(out: &mut Vec<u8>, name: &str, n_bins: usize, x_min: f64, x_max: f64, edges: &[f64]) {
    versioned(out, TAXIS_VERSION, |o| {
        put_tnamed(o, name, "");
        versioned(o, 4, |a| a.extend_from_slice(&[0u8; 36])); // TAttAxis
        o.extend_from_slice(&(n_bins as i32).to_be_bytes());
        o.extend_from_slice(&x_min.to_be_bytes());
        o.extend_from_slice(&x_max.to_be_bytes());
        put_array_d(o, edges);
        o.extend_from_slice(&1i32.to_be_bytes()); // fFirst
        o.extend_from_slice(&(n_bins as i32).to_be_bytes()); // fLast
        o.extend_from_slice(&0u16.to_be_bytes()); // fBits2
        o.push(0); // fTimeDisplay
        put_string(o, "");
    });
}

/// Streamed TH1F (`double == false`) or TH1D payload for `spec`.
pub fn encode_th1(spec: &HistSpec, double: bool) -> Vec<u8> {
    let n_bins = spec.contents.len();
    let n_cells = n_bins + 2;
    let with_flows = |v: &[f64]| -> Vec<f64> {
        let mut cells = Vec::with_capacity(n_cells);
        cells.push(0.0);
        cells.extend_from_slice(v);
        cells.push(0.0);
        cells
    };

    let mut out = Vec::new();
    versioned(&mut out, 3, |o| {
        versioned(o, TH1_VERSION, |h| {
            put_tnamed(h, &spec.name, &spec.title);
            versioned(h, 2, |a| a.extend_from_slice(&[0, 1, 0, 1, 0, 1])); // TAttLine
            versioned(h, 2, |a| a.extend_from_slice(&[0, 0, 3, 0xE9])); // TAttFill
            versioned(h, 2, |a| a.extend_from_slice(&[0, 1, 0, 1, 0x3F, 0x80, 0, 0])); // TAttMarker
            h.extend_from_slice(&(n_cells as i32).to_be_bytes());

            let edges = spec.edges.as_deref().unwrap_or(&[]);
            put_taxis(h, "xaxis", n_bins, spec.x_min, spec.x_max, edges);
            put_taxis(h, "yaxis", 1, 0.0, 1.0, &[]);
            put_taxis(h, "zaxis", 1, 0.0, 1.0, &[]);

            h.extend_from_slice(&0i16.to_be_bytes()); // fBarOffset
            h.extend_from_slice(&1000i16.to_be_bytes()); // fBarWidth
            h.extend_from_slice(&spec.entries.to_be_bytes());
            let sumw: f64 = spec.contents.iter().sum();
            for v in [sumw, sumw, 0.0, 0.0] {
                h.extend_from_slice(&v.to_be_bytes()); // fTsumw, fTsumw2, fTsumwx, fTsumwx2
            }
            for v in [-1111.0f64, -1111.0, 0.0] {
                h.extend_from_slice(&v.to_be_bytes()); // fMaximum, fMinimum, fNormFactor
            }
            put_array_d(h, &[]); // fContour
            match &spec.sumw2 {
                Some(sw2) => put_array_d(h, &with_flows(sw2)),
                None => put_array_d(h, &[]),
            }
            put_string(h, ""); // fOption
            versioned(h, 5, |l| {
                // fFunctions: empty TList
                l.extend_from_slice(&1u16.to_be_bytes());
                l.extend_from_slice(&0u32.to_be_bytes());
                l.extend_from_slice(&KOBJECT_BITS.to_be_bytes());
                put_string(l, "");
                l.extend_from_slice(&0u32.to_be_bytes());
            });
            h.extend_from_slice(&0i32.to_be_bytes()); // fBufferSize
            h.extend_from_slice(&0i32.to_be_bytes()); // fBinStatErrOpt
            h.extend_from_slice(&2i32.to_be_bytes()); // fStatOverflows
        });

        let cells = with_flows(&spec.contents);
        o.extend_from_slice(&(n_cells as u32).to_be_bytes());
        for c in cells {
            if double {
                o.extend_from_slice(&c.to_be_bytes());
            } else {
                o.extend_from_slice(&(c as f32).to_be_bytes());
            }
        }
    });
    out
}
