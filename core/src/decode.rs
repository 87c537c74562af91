use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::format::Format;
use crate::graph::{Graph, VertexId};
use crate::index::IndexMap;

/// Size in bytes of one binary slot (little-endian i64).
pub const SLOT_LEN: usize = 8;

/// Binary header: vertex count and max out-degree.
pub const HEADER_LEN: usize = 2 * SLOT_LEN;

/// Result of decoding one input.
///
/// `index` is present for formats that assign ordinals while scanning the
/// text. Binary input carries none: its ids double as ordinals.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub graph: Graph,
    pub index: Option<IndexMap>,
}

/// Decode a complete input buffer in the given format.
pub fn decode(format: Format, input: &[u8]) -> Result<Decoded> {
    if format.is_binary() {
        return decode_binary(input);
    }
    let text = std::str::from_utf8(input).map_err(|e| Error::InvalidUtf8 {
        line: input[..e.valid_up_to()].iter().filter(|b| **b == b'\n').count() + 1,
    })?;
    let lines: Vec<&str> = text.lines().collect();
    decode_lines(format, &lines)
}

/// Decode a text format from its lines (without line terminators).
pub fn decode_lines<S: AsRef<str>>(format: Format, lines: &[S]) -> Result<Decoded> {
    let decoded = match format {
        Format::VertexList => decode_vertex_list(lines)?,
        Format::EdgeList => decode_edge_list(lines)?,
        Format::EdgeListExtended => decode_edge_list_extended(lines)?,
        Format::Dimacs10 => decode_dimacs10(lines)?,
        Format::BinaryVertex => {
            return Err(Error::InvalidHeader {
                reason: "binary-vertex input cannot be read as text lines".to_string(),
            })
        }
    };
    debug!(
        %format,
        vertices = decoded.graph.vertex_count(),
        edges = decoded.graph.edge_count(),
        "decoded graph"
    );
    Ok(decoded)
}

// ---------------------------------------------------------------------------
// Vertex list
// ---------------------------------------------------------------------------

fn decode_vertex_list<S: AsRef<str>>(lines: &[S]) -> Result<Decoded> {
    let (header, rows) = lines.split_first().ok_or(Error::MissingHeader {
        format: Format::VertexList,
    })?;
    let expected: usize = Error::parse_int(header.as_ref(), 1)?;
    if rows.len() != expected {
        return Err(Error::CountMismatch {
            expected,
            found: rows.len(),
        });
    }

    let mut graph = Graph::with_capacity(expected);
    let mut index = IndexMap::with_capacity(expected);

    for (i, row) in rows.iter().enumerate() {
        let line = i + 2;
        let (id, neighbors) = parse_vertex_row(row.as_ref(), line)?;
        if graph.contains(id) {
            return Err(Error::DuplicateVertex {
                id,
                location: format!("line {}", line),
            });
        }
        index.assign(id);
        graph.set_neighbors(id, neighbors);
    }

    // Undeclared neighbors continue the ordinal sequence.
    for id in graph.complete() {
        index.assign(id);
    }

    Ok(Decoded {
        graph,
        index: Some(index),
    })
}

/// Parse `<id>: <n1> … <nk> #`.
fn parse_vertex_row(row: &str, line: usize) -> Result<(VertexId, Vec<VertexId>)> {
    let (id, rest) = row.split_once(':').ok_or(Error::MalformedLine { line })?;
    let id = Error::parse_int(id, line)?;

    let tokens: Vec<&str> = rest.split_whitespace().collect();
    match tokens.split_last() {
        Some((&"#", body)) => {
            let neighbors = body
                .iter()
                .map(|t| Error::parse_int(t, line))
                .collect::<Result<Vec<VertexId>>>()?;
            Ok((id, neighbors))
        }
        _ => Err(Error::MissingTerminator { line }),
    }
}

// ---------------------------------------------------------------------------
// Edge lists
// ---------------------------------------------------------------------------

fn decode_edge_list<S: AsRef<str>>(lines: &[S]) -> Result<Decoded> {
    let mut graph = Graph::new();
    let mut index = IndexMap::new();

    for (i, text) in lines.iter().enumerate() {
        let line = i + 1;
        let mut tokens = text.as_ref().trim().split('\t');
        let (src, dst) = parse_pair(tokens.next(), tokens.next(), line)?;
        push_edge(&mut graph, &mut index, src, dst);
    }

    Ok(Decoded {
        graph,
        index: Some(index),
    })
}

fn decode_edge_list_extended<S: AsRef<str>>(lines: &[S]) -> Result<Decoded> {
    let mut body = numbered_lines(lines).filter(|(_, text)| !is_comment(text));

    let (header_line, header) = body.next().ok_or(Error::MissingHeader {
        format: Format::EdgeListExtended,
    })?;
    let (vertex_count, edge_count) = parse_extended_header(header, header_line)?;

    let capacity = vertex_count.min(2 * lines.len());
    let mut graph = Graph::with_capacity(capacity);
    let mut index = IndexMap::with_capacity(capacity);

    for (line, text) in body {
        let mut tokens = text.split_whitespace();
        let (src, dst) = parse_pair(tokens.next(), tokens.next(), line)?;
        push_edge(&mut graph, &mut index, src, dst);
    }

    if graph.edge_count() != edge_count {
        warn!(
            declared = edge_count,
            found = graph.edge_count(),
            "edge count in header does not match body"
        );
    }

    // Isolated vertices are padded with ids above every real id so they
    // cannot collide with negative or sparse ids already in use.
    let mut next = graph.max_id().map_or(Some(0), |max| max.checked_add(1));
    while graph.vertex_count() < vertex_count {
        let id = next.ok_or_else(|| Error::InvalidHeader {
            reason: "no identifier space left for padding vertices".to_string(),
        })?;
        graph.add_vertex(id);
        index.assign(id);
        next = id.checked_add(1);
    }

    Ok(Decoded {
        graph,
        index: Some(index),
    })
}

/// `<flag> <vertexCount> <edgeCount>`, or the two-token
/// `<edgeCount> <vertexCount>` form the extended encoder writes.
fn parse_extended_header(header: &str, line: usize) -> Result<(usize, usize)> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    match tokens.as_slice() {
        [_flag, vertices, edges, ..] => Ok((
            Error::parse_int(vertices, line)?,
            Error::parse_int(edges, line)?,
        )),
        [edges, vertices] => Ok((
            Error::parse_int(vertices, line)?,
            Error::parse_int(edges, line)?,
        )),
        _ => Err(Error::MalformedLine { line }),
    }
}

fn parse_pair(src: Option<&str>, dst: Option<&str>, line: usize) -> Result<(VertexId, VertexId)> {
    match (src, dst) {
        (Some(src), Some(dst)) => Ok((Error::parse_int(src, line)?, Error::parse_int(dst, line)?)),
        _ => Err(Error::MalformedLine { line }),
    }
}

/// Ordinals follow first occurrence, source before destination.
fn push_edge(graph: &mut Graph, index: &mut IndexMap, src: VertexId, dst: VertexId) {
    index.assign(src);
    index.assign(dst);
    graph.add_edge(src, dst);
}

// ---------------------------------------------------------------------------
// DIMACS10
// ---------------------------------------------------------------------------

fn decode_dimacs10<S: AsRef<str>>(lines: &[S]) -> Result<Decoded> {
    let mut body = numbered_lines(lines).filter(|(_, text)| !is_comment(text));

    let (header_line, header) = body.next().ok_or(Error::MissingHeader {
        format: Format::Dimacs10,
    })?;
    let token = header
        .split_whitespace()
        .next()
        .ok_or(Error::MalformedLine { line: header_line })?;
    let expected: usize = Error::parse_int(token, header_line)?;

    let rows: Vec<(usize, &str)> = body.collect();
    if rows.len() > expected {
        return Err(Error::TooManyLines {
            expected,
            line: rows[expected].0,
        });
    }
    if rows.len() < expected {
        return Err(Error::CountMismatch {
            expected,
            found: rows.len(),
        });
    }

    let mut graph = Graph::with_capacity(expected);
    let mut index = IndexMap::with_capacity(expected);
    for id in 1..=expected as VertexId {
        graph.add_vertex(id);
        index.assign(id);
    }
    for (id, (line, text)) in (1..).zip(rows) {
        let neighbors = text
            .split_whitespace()
            .map(|t| Error::parse_int(t, line))
            .collect::<Result<Vec<VertexId>>>()?;
        graph.set_neighbors(id, neighbors);
    }

    // Neighbors outside 1..=Nv still need an entry.
    for id in graph.complete() {
        index.assign(id);
    }

    Ok(Decoded {
        graph,
        index: Some(index),
    })
}

fn numbered_lines<S: AsRef<str>>(lines: &[S]) -> impl Iterator<Item = (usize, &str)> {
    lines.iter().enumerate().map(|(i, l)| (i + 1, l.as_ref()))
}

fn is_comment(text: &str) -> bool {
    text.trim_start().starts_with('%')
}

// ---------------------------------------------------------------------------
// Binary vertex
// ---------------------------------------------------------------------------

/// Decode the fixed-width little-endian binary vertex layout.
pub fn decode_binary(input: &[u8]) -> Result<Decoded> {
    if input.len() < HEADER_LEN {
        return Err(Error::TruncatedHeader { len: input.len() });
    }
    let vertex_count = read_slot(&input[..SLOT_LEN]);
    let max_degree = read_slot(&input[SLOT_LEN..HEADER_LEN]);
    if vertex_count < 0 || max_degree < 0 {
        return Err(Error::InvalidHeader {
            reason: format!(
                "vertex count {} and max degree {} must be non-negative",
                vertex_count, max_degree
            ),
        });
    }
    let record_len = (max_degree as usize)
        .checked_add(1)
        .and_then(|slots| slots.checked_mul(SLOT_LEN))
        .ok_or_else(|| Error::InvalidHeader {
            reason: format!("max degree {} is too large", max_degree),
        })?;

    let vertex_count = vertex_count as usize;
    let mut graph = Graph::with_capacity(vertex_count.min((input.len() - HEADER_LEN) / record_len));
    let mut declared = HashSet::new();
    let mut offset = HEADER_LEN;

    for record in 0..vertex_count {
        let remaining = input.len() - offset;
        if remaining < record_len {
            return Err(Error::TruncatedRecord {
                record,
                expected: record_len,
                found: remaining,
            });
        }
        let bytes = &input[offset..offset + record_len];
        offset += record_len;

        let id = read_slot(&bytes[..SLOT_LEN]);
        if id < 0 {
            return Err(Error::InvalidVertexId { record, id });
        }
        if !declared.insert(id) {
            return Err(Error::DuplicateVertex {
                id,
                location: format!("record {}", record),
            });
        }
        graph.add_vertex(id);

        // First negative slot terminates the list; later slots are padding.
        for w in bytes[SLOT_LEN..]
            .chunks_exact(SLOT_LEN)
            .map(read_slot)
            .take_while(|w| *w >= 0)
        {
            graph.add_edge(id, w);
        }
    }

    if offset < input.len() {
        warn!(
            trailing_bytes = input.len() - offset,
            "ignoring bytes after the last declared record"
        );
    }
    debug!(
        format = %Format::BinaryVertex,
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "decoded graph"
    );

    Ok(Decoded { graph, index: None })
}

fn read_slot(bytes: &[u8]) -> i64 {
    let mut buf = [0u8; SLOT_LEN];
    buf.copy_from_slice(bytes);
    i64::from_le_bytes(buf)
}
