use std::fmt;
use std::str::FromStr;

/// Serialization formats understood by the decoders and encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `N` header, then `<id>: <n1> … <nk> #` per vertex.
    VertexList,
    /// `<src>\t<dst>` per edge, no header.
    EdgeList,
    /// `%` comments, `<flag> <vertices> <edges>` header, `<src> <dst>` pairs.
    EdgeListExtended,
    /// `<Nv> <Ne>` header, then one 1-based neighbor line per vertex.
    Dimacs10,
    /// Little-endian i64 header `Nv Emax`, then `1 + Emax` slots per vertex.
    BinaryVertex,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::VertexList,
        Format::EdgeList,
        Format::EdgeListExtended,
        Format::Dimacs10,
        Format::BinaryVertex,
    ];

    pub fn is_binary(self) -> bool {
        matches!(self, Format::BinaryVertex)
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::VertexList => "vertex-list",
            Format::EdgeList => "edge-list",
            Format::EdgeListExtended => "edge-list-ext",
            Format::Dimacs10 => "dimacs10",
            Format::BinaryVertex => "binary-vertex",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vertex-list" | "v" => Ok(Format::VertexList),
            "edge-list" | "e" => Ok(Format::EdgeList),
            "edge-list-ext" | "ee" => Ok(Format::EdgeListExtended),
            "dimacs10" | "dimacs" | "d" => Ok(Format::Dimacs10),
            "binary-vertex" | "bv" => Ok(Format::BinaryVertex),
            other => Err(format!(
                "unknown format '{}': use vertex-list, edge-list, edge-list-ext, dimacs10 or binary-vertex",
                other
            )),
        }
    }
}
