use std::io::Write;

use tracing::info;

use crate::config::ConvertOptions;
use crate::decode::decode;
use crate::encode::{encode, Encoded};
use crate::error::Result;
use crate::format::Format;
use crate::graph::Graph;
use crate::index::IndexMap;
use crate::transform::{apply_transforms, TransformReport};

/// Outcome of a conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub self_loops_removed: usize,
    pub reciprocal_edges_added: usize,
    pub bytes_written: u64,
    pub memory_bytes: usize,
}

/// A decoded and transformed graph, ready to be encoded.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub graph: Graph,
    pub index: Option<IndexMap>,
    pub report: TransformReport,
}

/// Decode `input` and apply the transforms selected in `options`.
///
/// Nothing is written here, so a malformed input fails before any output
/// exists.
pub fn prepare(input: &[u8], from: Format, options: &ConvertOptions) -> Result<Prepared> {
    let decoded = decode(from, input)?;
    let mut graph = decoded.graph;
    let report = apply_transforms(&mut graph, options);

    // Transforms may create vertices the decoder never assigned.
    let index = decoded.index.map(|mut index| {
        index.extend_from(&graph);
        index
    });

    Ok(Prepared {
        graph,
        index,
        report,
    })
}

impl Prepared {
    /// Encode in `to` without writing anything yet, so that id-range
    /// failures surface before the caller creates its output.
    pub fn encoded(&self, to: Format, sort: bool) -> Result<Encoded<'_>> {
        encode(to, &self.graph, self.index.as_ref(), sort)
    }

    /// Encode to `writer` in `to`.
    pub fn write<W: Write>(&self, to: Format, sort: bool, writer: &mut W) -> Result<Summary> {
        let encoded = self.encoded(to, sort)?;
        self.write_encoded(to, encoded, writer)
    }

    /// Stream an already encoded graph to `writer` and summarise the run.
    pub fn write_encoded<W: Write>(
        &self,
        to: Format,
        encoded: Encoded<'_>,
        writer: &mut W,
    ) -> Result<Summary> {
        let bytes_written = encoded.write_to(writer)?;
        writer.flush()?;

        let summary = Summary {
            vertex_count: self.graph.vertex_count(),
            edge_count: self.graph.edge_count(),
            self_loops_removed: self.report.self_loops_removed,
            reciprocal_edges_added: self.report.reciprocal_edges_added,
            bytes_written,
            memory_bytes: self.graph.memory_usage(),
        };
        info!(
            format = %to,
            vertices = summary.vertex_count,
            edges = summary.edge_count,
            bytes = bytes_written,
            "wrote graph"
        );
        Ok(summary)
    }
}

/// Full pipeline: decode, transform, encode.
pub fn convert<W: Write>(
    input: &[u8],
    from: Format,
    to: Format,
    options: &ConvertOptions,
    writer: &mut W,
) -> Result<Summary> {
    prepare(input, from, options)?.write(to, options.sort, writer)
}
