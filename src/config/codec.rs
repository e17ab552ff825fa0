//! Value codecs.
//!
//! # Responsibilities
//! - Convert configuration values to and from their text form
//! - Compose container codecs from their element codecs
//!
//! # Design Decisions
//! - Leaf scalars go through `FromStr` / `Display`
//! - Containers parse their text into a `Node`, then hand each child's text
//!   to the element codec; nesting needs no extra code
//! - Decoding is all-or-nothing: one bad element fails the whole container

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::CodecError;
use crate::document::Node;

/// Bidirectional conversion between a value and its text form.
pub trait Codec: Sized {
    /// Parse `text` into a value.
    fn decode(text: &str) -> Result<Self, CodecError>;

    /// Render the value as text accepted by [`Codec::decode`].
    fn encode(&self) -> Result<String, CodecError>;
}

macro_rules! impl_parse_codec {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Codec for $ty {
                fn decode(text: &str) -> Result<Self, CodecError> {
                    text.trim()
                        .parse::<$ty>()
                        .map_err(|e| CodecError::decode::<$ty>(text, e))
                }

                fn encode(&self) -> Result<String, CodecError> {
                    Ok(self.to_string())
                }
            }
        )*
    };
}

impl_parse_codec!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl Codec for bool {
    fn decode(text: &str) -> Result<Self, CodecError> {
        let t = text.trim();
        if t.eq_ignore_ascii_case("true") || t == "1" {
            Ok(true)
        } else if t.eq_ignore_ascii_case("false") || t == "0" {
            Ok(false)
        } else {
            Err(CodecError::decode::<bool>(text, "expected true/false"))
        }
    }

    fn encode(&self) -> Result<String, CodecError> {
        Ok(self.to_string())
    }
}

impl Codec for char {
    fn decode(text: &str) -> Result<Self, CodecError> {
        text.parse::<char>().map_err(|e| CodecError::decode::<char>(text, e))
    }

    fn encode(&self) -> Result<String, CodecError> {
        Ok(self.to_string())
    }
}

impl Codec for String {
    fn decode(text: &str) -> Result<Self, CodecError> {
        Ok(text.to_string())
    }

    fn encode(&self) -> Result<String, CodecError> {
        Ok(self.clone())
    }
}

impl Codec for PathBuf {
    fn decode(text: &str) -> Result<Self, CodecError> {
        Ok(PathBuf::from(text))
    }

    fn encode(&self) -> Result<String, CodecError> {
        Ok(self.to_string_lossy().into_owned())
    }
}

impl<T: Codec> Codec for Vec<T> {
    fn decode(text: &str) -> Result<Self, CodecError> {
        decode_sequence(text)
    }

    fn encode(&self) -> Result<String, CodecError> {
        encode_sequence(self.iter())
    }
}

impl<T: Codec> Codec for VecDeque<T> {
    fn decode(text: &str) -> Result<Self, CodecError> {
        decode_sequence(text)
    }

    fn encode(&self) -> Result<String, CodecError> {
        encode_sequence(self.iter())
    }
}

impl<T: Codec + Eq + Hash> Codec for HashSet<T> {
    fn decode(text: &str) -> Result<Self, CodecError> {
        decode_sequence(text)
    }

    fn encode(&self) -> Result<String, CodecError> {
        encode_sequence(self.iter())
    }
}

impl<T: Codec + Ord> Codec for BTreeSet<T> {
    fn decode(text: &str) -> Result<Self, CodecError> {
        decode_sequence(text)
    }

    fn encode(&self) -> Result<String, CodecError> {
        encode_sequence(self.iter())
    }
}

impl<T: Codec> Codec for HashMap<String, T> {
    fn decode(text: &str) -> Result<Self, CodecError> {
        decode_mapping(text)
    }

    fn encode(&self) -> Result<String, CodecError> {
        encode_mapping(self.iter())
    }
}

impl<T: Codec> Codec for BTreeMap<String, T> {
    fn decode(text: &str) -> Result<Self, CodecError> {
        decode_mapping(text)
    }

    fn encode(&self) -> Result<String, CodecError> {
        encode_mapping(self.iter())
    }
}

/// Decode a struct-shaped value from YAML through serde.
pub fn yaml_decode<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    serde_yaml_ng::from_str(text).map_err(|e| CodecError::decode::<T>(text, e))
}

/// Encode a struct-shaped value as YAML through serde.
pub fn yaml_encode<T: Serialize>(value: &T) -> Result<String, CodecError> {
    serde_yaml_ng::to_string(value)
        .map(|s| s.trim_end().to_string())
        .map_err(|e| CodecError::encode::<T>(e))
}

fn parse_container<C>(text: &str) -> Result<Node, CodecError> {
    Node::parse(text).map_err(|e| CodecError::decode::<C>(text, e))
}

fn decode_child<T: Codec>(node: &Node) -> Result<T, CodecError> {
    T::decode(&node.to_text()?)
}

fn decode_sequence<T, C>(text: &str) -> Result<C, CodecError>
where
    T: Codec,
    C: FromIterator<T>,
{
    match parse_container::<C>(text)? {
        Node::Sequence(items) => items.iter().map(decode_child::<T>).collect(),
        node if node.is_empty() => Ok(std::iter::empty().collect()),
        node => Err(CodecError::decode::<C>(
            text,
            format!("expected a sequence, found {:?}", node.kind()),
        )),
    }
}

fn decode_mapping<T, C>(text: &str) -> Result<C, CodecError>
where
    T: Codec,
    C: FromIterator<(String, T)>,
{
    match parse_container::<C>(text)? {
        Node::Mapping(pairs) => pairs
            .iter()
            .map(|(k, v)| decode_child::<T>(v).map(|value| (k.clone(), value)))
            .collect(),
        node if node.is_empty() => Ok(std::iter::empty().collect()),
        node => Err(CodecError::decode::<C>(
            text,
            format!("expected a mapping, found {:?}", node.kind()),
        )),
    }
}

/// Encode one element and lift it into a child node.
///
/// Element text becomes structure only when it re-parses to a container whose
/// own text is identical; anything else stays a raw scalar so it decodes back
/// unchanged.
fn encode_child<T: Codec>(value: &T) -> Result<Node, CodecError> {
    let text = value.encode()?;
    match Node::parse(&text) {
        Ok(node) if !node.is_scalar() && node.to_text().ok().as_deref() == Some(text.as_str()) => {
            Ok(node)
        }
        _ => Ok(Node::Scalar(text)),
    }
}

fn encode_sequence<'a, T, I>(items: I) -> Result<String, CodecError>
where
    T: Codec + 'a,
    I: Iterator<Item = &'a T>,
{
    let nodes = items.map(encode_child).collect::<Result<Vec<_>, _>>()?;
    Ok(Node::Sequence(nodes).to_text()?)
}

fn encode_mapping<'a, T, I>(pairs: I) -> Result<String, CodecError>
where
    T: Codec + 'a,
    I: Iterator<Item = (&'a String, &'a T)>,
{
    let nodes = pairs
        .map(|(k, v)| encode_child(v).map(|node| (k.clone(), node)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Node::Mapping(nodes).to_text()?)
}
