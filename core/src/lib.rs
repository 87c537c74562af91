//! gconv-core: graph format conversion engine.
//!
//! Holds an insertion-ordered adjacency-list graph, the decoders and encoders
//! for the vertex-list, edge-list (plain and extended), DIMACS10 and binary
//! vertex formats, and the two structural transforms (self-loop removal and
//! undirected closure). No file handles: inputs are byte buffers or lines,
//! outputs go to any `std::io::Write`.

mod config;
mod convert;
mod decode;
mod encode;
mod error;
mod format;
mod graph;
mod index;
mod transform;

pub use config::ConvertOptions;
pub use convert::{convert, prepare, Prepared, Summary};
pub use decode::{decode, decode_binary, decode_lines, Decoded, HEADER_LEN, SLOT_LEN};
pub use encode::{
    encode, encode_dimacs10, encode_edge_list, encode_edge_list_extended, encode_vertex_list,
    BinaryRecords, Encoded, PADDING,
};
pub use error::{Error, Result};
pub use format::Format;
pub use graph::{Graph, VertexId};
pub use index::{IndexMap, Ordinal};
pub use transform::{
    apply_transforms, enforce_undirected, missing_reciprocals, remove_self_loops,
    TransformReport,
};
