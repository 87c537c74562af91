use std::borrow::Cow;
use std::io::{self, Write};

use tracing::{debug, warn};

use crate::decode::{HEADER_LEN, SLOT_LEN};
use crate::error::{Error, Result};
use crate::format::Format;
use crate::graph::{Graph, VertexId};
use crate::index::IndexMap;

/// Slot value filling unused neighbor positions in binary records.
pub const PADDING: i64 = -1;

/// Encoder output: complete text, or a lazy stream of binary records.
pub enum Encoded<'a> {
    Text(String),
    Binary(BinaryRecords<'a>),
}

impl Encoded<'_> {
    /// Write everything to `writer`, returning the number of bytes written.
    pub fn write_to<W: Write>(self, writer: &mut W) -> io::Result<u64> {
        match self {
            Encoded::Text(text) => {
                writer.write_all(text.as_bytes())?;
                Ok(text.len() as u64)
            }
            Encoded::Binary(records) => {
                let mut written = 0u64;
                for record in records {
                    writer.write_all(&record)?;
                    written += record.len() as u64;
                }
                Ok(written)
            }
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Encoded::Text(text) => text.into_bytes(),
            Encoded::Binary(records) => records.flatten().collect(),
        }
    }
}

/// Encode `graph` in `format`.
///
/// With `sort`, vertices and each neighbor list come out in ascending ordinal
/// order (raw id when no index is given); otherwise insertion order is kept.
///
/// Fails with [`Error::IdRangeOverflow`] when a format that shifts ids down
/// to a fixed base cannot represent the graph's id range.
pub fn encode<'a>(
    format: Format,
    graph: &'a Graph,
    index: Option<&'a IndexMap>,
    sort: bool,
) -> Result<Encoded<'a>> {
    debug!(
        %format,
        sort,
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "encoding graph"
    );
    Ok(match format {
        Format::VertexList => Encoded::Text(encode_vertex_list(graph, index, sort)),
        Format::EdgeList => Encoded::Text(encode_edge_list(graph, index, sort)),
        Format::EdgeListExtended => Encoded::Text(encode_edge_list_extended(graph, index, sort)?),
        Format::Dimacs10 => Encoded::Text(encode_dimacs10(graph, index, sort)?),
        Format::BinaryVertex => Encoded::Binary(BinaryRecords::new(graph, index, sort)?),
    })
}

/// Smallest id of `graph`, to be subtracted from every id before `base` is
/// added. Checks that `max - min + base` fits in an i64, which bounds every
/// shifted id.
fn skew(graph: &Graph, format: Format, base: i64) -> Result<VertexId> {
    let (Some(min), Some(max)) = (graph.min_id(), graph.max_id()) else {
        return Ok(0);
    };
    max.checked_sub(min)
        .and_then(|span| span.checked_add(base))
        .map(|_| min)
        .ok_or(Error::IdRangeOverflow { format, min, max })
}

/// Emission order for vertices and neighbors.
#[derive(Clone, Copy)]
struct Layout<'a> {
    graph: &'a Graph,
    index: Option<&'a IndexMap>,
    sort: bool,
}

impl<'a> Layout<'a> {
    fn new(graph: &'a Graph, index: Option<&'a IndexMap>, sort: bool) -> Self {
        Self { graph, index, sort }
    }

    /// Ordinal of `id`, or the raw id when no index covers it.
    fn position(&self, id: VertexId) -> i64 {
        self.index
            .and_then(|index| index.ordinal(id))
            .map_or(id, |ordinal| ordinal as i64)
    }

    fn vertices(&self) -> Vec<VertexId> {
        let mut ids = self.graph.vertices().to_vec();
        if self.sort {
            ids.sort_by_key(|&id| self.position(id));
        }
        ids
    }

    fn neighbors(&self, id: VertexId) -> Cow<'a, [VertexId]> {
        let neighbors = self.graph.neighbors(id);
        if self.sort {
            let mut sorted = neighbors.to_vec();
            sorted.sort_by_key(|&w| self.position(w));
            Cow::Owned(sorted)
        } else {
            Cow::Borrowed(neighbors)
        }
    }
}

/// `<count>` then `<ref>: <n1> … #` per vertex, references being ordinals.
pub fn encode_vertex_list(graph: &Graph, index: Option<&IndexMap>, sort: bool) -> String {
    let layout = Layout::new(graph, index, sort);
    let mut lines = Vec::with_capacity(graph.vertex_count() + 1);
    lines.push(graph.vertex_count().to_string());

    for v in layout.vertices() {
        let mut line = format!("{}:", layout.position(v));
        for &w in layout.neighbors(v).iter() {
            line.push(' ');
            line.push_str(&layout.position(w).to_string());
        }
        line.push_str(" #");
        lines.push(line);
    }

    lines.join("\n")
}

/// `<src>\t<dst>` per adjacency entry, raw ids, no header.
pub fn encode_edge_list(graph: &Graph, index: Option<&IndexMap>, sort: bool) -> String {
    let layout = Layout::new(graph, index, sort);
    let mut lines = Vec::with_capacity(graph.edge_count());
    for v in layout.vertices() {
        for &w in layout.neighbors(v).iter() {
            lines.push(format!("{}\t{}", v, w));
        }
    }
    lines.join("\n")
}

/// `<totalEdges>\t<vertexCount>` header, then edges with ids shifted so the
/// smallest is 0.
pub fn encode_edge_list_extended(
    graph: &Graph,
    index: Option<&IndexMap>,
    sort: bool,
) -> Result<String> {
    let layout = Layout::new(graph, index, sort);
    let skew = skew(graph, Format::EdgeListExtended, 0)?;
    let mut lines = Vec::with_capacity(graph.edge_count() + 1);
    lines.push(format!("{}\t{}", graph.edge_count(), graph.vertex_count()));
    for v in layout.vertices() {
        for &w in layout.neighbors(v).iter() {
            lines.push(format!("{}\t{}", v - skew, w - skew));
        }
    }
    Ok(lines.join("\n"))
}

/// `<Nv> <Ne>` header, then one line of 1-based neighbor ids per vertex.
///
/// `Ne` is half the adjacency total, truncated; the graph is assumed to be
/// symmetric already. Every line is newline-terminated so that a trailing
/// isolated vertex keeps its (empty) line.
///
/// Readers take a line's position as its vertex id, so rows are only
/// faithful when they come out as the dense run `min, min + 1, …`; any other
/// order is written as requested and logged.
pub fn encode_dimacs10(graph: &Graph, index: Option<&IndexMap>, sort: bool) -> Result<String> {
    let layout = Layout::new(graph, index, sort);
    let skew = skew(graph, Format::Dimacs10, 1)?;
    let vertices = layout.vertices();
    if !rows_match_ids(&vertices, skew) {
        warn!(
            sort,
            "vertex rows are not in dense ascending id order: \
             line positions will not match vertex ids when read back"
        );
    }
    let total = graph.edge_count();
    if total % 2 != 0 {
        warn!(
            adjacency_entries = total,
            "odd adjacency total: graph is not symmetric, edge count is truncated"
        );
    }

    let mut out = format!("{} {}\n", graph.vertex_count(), total / 2);
    for v in vertices {
        let line: Vec<String> = layout
            .neighbors(v)
            .iter()
            .map(|&w| (w - skew + 1).to_string())
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    Ok(out)
}

/// True when row `i` holds vertex `skew + i` for every row.
fn rows_match_ids(vertices: &[VertexId], skew: VertexId) -> bool {
    vertices
        .iter()
        .enumerate()
        .all(|(i, &v)| u64::try_from(v - skew).ok() == Some(i as u64))
}

/// Lazy binary encoder: yields the 16-byte header, then one record of
/// `1 + max_degree` little-endian i64 slots per vertex.
pub struct BinaryRecords<'a> {
    layout: Layout<'a>,
    vertices: std::vec::IntoIter<VertexId>,
    skew: VertexId,
    max_degree: usize,
    header_pending: bool,
}

impl<'a> BinaryRecords<'a> {
    pub fn new(graph: &'a Graph, index: Option<&'a IndexMap>, sort: bool) -> Result<Self> {
        let layout = Layout::new(graph, index, sort);
        Ok(Self {
            skew: skew(graph, Format::BinaryVertex, 0)?,
            vertices: layout.vertices().into_iter(),
            layout,
            max_degree: graph.max_degree(),
            header_pending: true,
        })
    }

    /// Bytes per vertex record.
    pub fn record_len(&self) -> usize {
        (1 + self.max_degree) * SLOT_LEN
    }

    fn header(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN);
        bytes.extend_from_slice(&(self.layout.graph.vertex_count() as i64).to_le_bytes());
        bytes.extend_from_slice(&(self.max_degree as i64).to_le_bytes());
        bytes
    }
}

impl Iterator for BinaryRecords<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.header_pending {
            self.header_pending = false;
            return Some(self.header());
        }

        let v = self.vertices.next()?;
        let neighbors = self.layout.neighbors(v);
        let mut record = Vec::with_capacity(self.record_len());
        record.extend_from_slice(&(v - self.skew).to_le_bytes());
        for &w in neighbors.iter() {
            record.extend_from_slice(&(w - self.skew).to_le_bytes());
        }
        for _ in neighbors.len()..self.max_degree {
            record.extend_from_slice(&PADDING.to_le_bytes());
        }
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.vertices.len() + usize::from(self.header_pending);
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    fn from_edges(edges: &[(VertexId, VertexId)]) -> Graph {
        let mut g = Graph::new();
        for &(from, to) in edges {
            g.add_edge(from, to);
        }
        g
    }

    fn slots(bytes: &[u8]) -> Vec<i64> {
        bytes
            .chunks_exact(SLOT_LEN)
            .map(|c| i64::from_le_bytes(c.try_into().unwrap()))
            .collect()
    }

    // --- Vertex list ---

    #[test]
    fn test_vertex_list_sorted_reproduces_input() {
        let input = "2\n0: 1 #\n1: #";
        let d = decode(Format::VertexList, input.as_bytes()).unwrap();
        assert_eq!(encode_vertex_list(&d.graph, d.index.as_ref(), true), input);
    }

    #[test]
    fn test_vertex_list_emits_ordinals() {
        let d = decode(Format::VertexList, b"2\n10: 30 20 #\n20: #").unwrap();
        let out = encode_vertex_list(&d.graph, d.index.as_ref(), false);
        assert_eq!(out, "3\n0: 2 1 #\n1: #\n2: #");
        let sorted = encode_vertex_list(&d.graph, d.index.as_ref(), true);
        assert_eq!(sorted, "3\n0: 1 2 #\n1: #\n2: #");
    }

    #[test]
    fn test_vertex_list_without_index_uses_raw_ids() {
        let g = from_edges(&[(7, 3)]);
        assert_eq!(encode_vertex_list(&g, None, true), "2\n3: #\n7: 3 #");
    }

    // --- Edge lists ---

    #[test]
    fn test_edge_list_raw_ids_in_insertion_order() {
        let g = from_edges(&[(5, 1), (1, 5), (5, 0)]);
        assert_eq!(encode_edge_list(&g, None, false), "5\t1\n5\t0\n1\t5");
    }

    #[test]
    fn test_edge_list_sort_by_ordinal() {
        let d = decode(Format::EdgeList, b"9\t2\n2\t9\n9\t1").unwrap();
        let out = encode_edge_list(&d.graph, d.index.as_ref(), true);
        // ordinals: 9 → 0, 2 → 1, 1 → 2
        assert_eq!(out, "9\t2\n9\t1\n2\t9");
        let raw = encode_edge_list(&d.graph, None, true);
        assert_eq!(raw, "2\t9\n9\t1\n9\t2");
    }

    #[test]
    fn test_edge_list_empty_graph() {
        assert_eq!(encode_edge_list(&Graph::new(), None, false), "");
    }

    #[test]
    fn test_edge_list_extended_skews_to_zero() {
        let g = from_edges(&[(-2, 0), (0, 3)]);
        let out = encode_edge_list_extended(&g, None, false).unwrap();
        assert_eq!(out, "2\t3\n0\t2\n2\t5");
    }

    #[test]
    fn test_extended_rejects_id_span_beyond_i64() {
        let g = from_edges(&[(i64::MIN, i64::MAX)]);
        let err = encode_edge_list_extended(&g, None, false).unwrap_err();
        assert!(matches!(
            err,
            Error::IdRangeOverflow {
                format: Format::EdgeListExtended,
                min: i64::MIN,
                max: i64::MAX,
            }
        ));
    }

    #[test]
    fn test_extended_accepts_widest_representable_span() {
        let g = from_edges(&[(-1, i64::MAX - 1)]);
        let out = encode_edge_list_extended(&g, None, false).unwrap();
        assert_eq!(out, format!("1\t2\n0\t{}", i64::MAX));
    }

    // --- DIMACS10 ---

    #[test]
    fn test_dimacs_one_based_lines() {
        let g = from_edges(&[(0, 1), (1, 0), (1, 2), (2, 1)]);
        assert_eq!(encode_dimacs10(&g, None, true).unwrap(), "3 2\n2\n1 3\n2\n");
    }

    #[test]
    fn test_dimacs_odd_total_truncates() {
        let g = from_edges(&[(0, 1), (1, 0), (1, 2)]);
        assert!(encode_dimacs10(&g, None, false).unwrap().starts_with("3 1\n"));
    }

    #[test]
    fn test_dimacs_trailing_isolated_vertex_round_trips() {
        let mut g = from_edges(&[(1, 2), (2, 1)]);
        g.add_vertex(3);
        let out = encode_dimacs10(&g, None, true).unwrap();
        let back = decode(Format::Dimacs10, out.as_bytes()).unwrap();
        assert_eq!(back.graph, g);
    }

    #[test]
    fn test_dimacs_rejects_one_based_overflow() {
        let g = from_edges(&[(0, i64::MAX)]);
        let err = encode_dimacs10(&g, None, false).unwrap_err();
        assert!(matches!(err, Error::IdRangeOverflow { format: Format::Dimacs10, .. }));
        // Same span shifted down by one still fits.
        let g = from_edges(&[(0, i64::MAX - 1)]);
        assert!(encode_dimacs10(&g, None, false).is_ok());
    }

    #[test]
    fn test_dimacs_rows_match_ids() {
        assert!(rows_match_ids(&[4, 5, 6], 4));
        assert!(rows_match_ids(&[], 0));
        // Discovery order 2, 1 would put vertex 2 on line 1.
        assert!(!rows_match_ids(&[2, 1], 1));
        // Sparse ids leave a gap in the line numbering.
        assert!(!rows_match_ids(&[0, 2], 0));
    }

    #[test]
    fn test_dimacs_unsorted_rows_still_written() {
        let d = decode(Format::EdgeList, b"2\t1").unwrap();
        let out = encode_dimacs10(&d.graph, d.index.as_ref(), false).unwrap();
        assert_eq!(out, "2 0\n1\n\n");
        let sorted = encode_dimacs10(&d.graph, None, true).unwrap();
        assert_eq!(sorted, "2 0\n\n1\n");
    }

    // --- Binary ---

    #[test]
    fn test_binary_record_layout() {
        let d = decode(Format::BinaryVertex, &{
            let s: Vec<i64> = vec![2, 1, 0, 1, 1, -1];
            s.iter().flat_map(|v| v.to_le_bytes()).collect::<Vec<u8>>()
        })
        .unwrap();
        let bytes = encode(Format::BinaryVertex, &d.graph, None, false)
            .unwrap()
            .into_bytes();
        assert_eq!(slots(&bytes), vec![2, 1, 0, 1, 1, -1]);
    }

    #[test]
    fn test_binary_reencode_adds_completed_vertex() {
        // Nv=1, Emax=2, record [0, 1, -1]: neighbor 1 has no record of its own.
        let input: Vec<u8> = [1i64, 2, 0, 1, -1]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let d = decode(Format::BinaryVertex, &input).unwrap();
        let bytes = encode(Format::BinaryVertex, &d.graph, None, false)
            .unwrap()
            .into_bytes();
        assert_eq!(slots(&bytes), vec![2, 1, 0, 1, 1, -1]);
    }

    #[test]
    fn test_binary_pads_and_skews() {
        let g = from_edges(&[(5, 6), (5, 7), (6, 5)]);
        let records: Vec<Vec<u8>> = BinaryRecords::new(&g, None, true).unwrap().collect();
        assert_eq!(records.len(), 4);
        assert_eq!(slots(&records[0]), vec![3, 2]);
        assert_eq!(slots(&records[1]), vec![0, 1, 2]);
        assert_eq!(slots(&records[2]), vec![1, 0, -1]);
        assert_eq!(slots(&records[3]), vec![2, -1, -1]);
    }

    #[test]
    fn test_binary_rejects_id_span_beyond_i64() {
        let g = from_edges(&[(-2, i64::MAX)]);
        let err = encode(Format::BinaryVertex, &g, None, false).err().unwrap();
        assert!(matches!(err, Error::IdRangeOverflow { format: Format::BinaryVertex, .. }));
    }

    #[test]
    fn test_binary_size_hint_and_record_len() {
        let g = from_edges(&[(0, 1), (0, 2)]);
        let records = BinaryRecords::new(&g, None, false).unwrap();
        assert_eq!(records.size_hint(), (4, Some(4)));
        assert_eq!(records.record_len(), 24);
    }

    #[test]
    fn test_binary_empty_graph_header_only() {
        let bytes = encode(Format::BinaryVertex, &Graph::new(), None, false)
            .unwrap()
            .into_bytes();
        assert_eq!(slots(&bytes), vec![0, 0]);
    }

    // --- Output ---

    #[test]
    fn test_write_to_counts_bytes() {
        let g = from_edges(&[(0, 1)]);
        let mut buf = Vec::new();
        let n = encode(Format::BinaryVertex, &g, None, false)
            .unwrap()
            .write_to(&mut buf)
            .unwrap();
        assert_eq!(n, buf.len() as u64);
        assert_eq!(n, 16 + 2 * 16);

        let mut text = Vec::new();
        let n = encode(Format::EdgeList, &g, None, false)
            .unwrap()
            .write_to(&mut text)
            .unwrap();
        assert_eq!(text, b"0\t1");
        assert_eq!(n, 3);
    }
}
