//! Pipeline composition and the crate's public operations.
//!
//! A [`Pipeline`] wires one parser, an ordered filter chain, and one encoder
//! behind trait objects; [`PipelineBuilder`] resolves format tags and
//! compiles filter paths eagerly so a built pipeline can only fail in its
//! three run stages. The free functions [`convert`], [`analyze`], and
//! [`detect_shape`] are the byte-in/text-out surface callers wrap.

use serde::Serialize;

use crate::encode::{all_encoders, encoder_for, Encoded, Encoder};
use crate::error::PipelineError;
use crate::filter::{compile, Filter, FilterSpec};
use crate::format::Format;
use crate::parse::{detect, parser_for, Parser};
use crate::shape::{classify, recommend, ShapeReport, ShapeTag};
use crate::tokens::{estimate_tokens, savings};

/// One parser, an ordered list of filters, one encoder.
pub struct Pipeline {
    parser: Box<dyn Parser>,
    filters: Vec<Box<dyn Filter>>,
    encoder: Box<dyn Encoder>,
}

impl Pipeline {
    /// Execute all three stages on one input. Errors are tagged by stage;
    /// no partial output is ever produced.
    pub fn run(&self, input: &[u8]) -> Result<Encoded, PipelineError> {
        let mut value = self.parser.parse(input)?;
        for filter in &self.filters {
            value = filter.apply(value)?;
        }
        Ok(self.encoder.encode(&value)?)
    }

    pub fn input_format(&self) -> &'static str {
        self.parser.format_name()
    }

    pub fn output_format(&self) -> &'static str {
        self.encoder.format_name()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("parser", &self.parser.format_name())
            .field("filters", &self.filters.iter().map(|flt| flt.name()).collect::<Vec<_>>())
            .field("encoder", &self.encoder.format_name())
            .finish()
    }
}

/// Builds a [`Pipeline`] from format tags and filter descriptions. All tag
/// and path validation happens in [`PipelineBuilder::build`]; nothing fails
/// lazily inside `run`.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    input: String,
    output: String,
    filters: Vec<FilterSpec>,
    strict: bool,
}

impl PipelineBuilder {
    /// Start from an input tag (`json`, `yaml`, `xml`, `csv`, `tsv`) and an
    /// output tag (`toon`, `json`, `yaml`, `tsv`, `csv`), case-insensitive.
    pub fn new(input_tag: &str, output_tag: &str) -> Self {
        PipelineBuilder {
            input: input_tag.to_string(),
            output: output_tag.to_string(),
            filters: Vec::new(),
            strict: false,
        }
    }

    /// Append a filter; the chain runs in the order filters were added.
    pub fn filter(mut self, spec: FilterSpec) -> Self {
        self.filters.push(spec);
        self
    }

    /// Fail instead of truncating (see `FilterError::LimitExceeded`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let parser = parser_for(Format::from_tag(&self.input)?)?;
        let encoder = encoder_for(Format::from_tag(&self.output)?)?;
        let filters = self
            .filters
            .iter()
            .map(|spec| compile(spec, self.strict))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Pipeline {
            parser,
            filters,
            encoder,
        })
    }
}

/// Options for [`convert`].
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Pin the input format; absent means auto-detect.
    pub input_format: Option<Format>,
    /// Pin the output format; absent means follow the shape analyzer's
    /// recommendation for the filtered value.
    pub output_format: Option<Format>,
    /// Filename hint for auto-detection (extension only; never opened).
    pub filename: Option<String>,
    pub filters: Vec<FilterSpec>,
    /// Fail instead of truncating.
    pub strict: bool,
}

/// Parse, filter, and encode one payload.
pub fn convert(input: &[u8], options: &ConvertOptions) -> Result<String, PipelineError> {
    let format = resolve_input(input, options.input_format, options.filename.as_deref());
    let parser = parser_for(format)?;
    let mut value = parser.parse(input)?;
    for spec in &options.filters {
        let filter = compile(spec, options.strict)?;
        value = filter.apply(value)?;
    }
    let output = match options.output_format {
        Some(format) => format,
        None => recommend(&classify(&value)),
    };
    let encoder = encoder_for(output)?;
    Ok(encoder.encode(&value)?.text)
}

/// Per-encoder outcome inside an [`AnalysisReport`]. Encoders that cannot
/// represent the value report a reason instead of failing the analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncoderReport {
    pub format: &'static str,
    pub tokens: Option<usize>,
    pub savings_vs_input: Option<f64>,
    pub error: Option<String>,
}

/// What [`analyze`] learned about one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub input_format: Format,
    pub shape: ShapeReport,
    pub recommended: Format,
    /// Estimated tokens of the raw input bytes.
    pub input_tokens: usize,
    pub encodings: Vec<EncoderReport>,
}

/// Parse once, encode with every available encoder, and report estimated
/// token counts and savings. Per-encoder failures are recorded, not raised.
pub fn analyze(input: &[u8], input_format: Option<Format>) -> Result<AnalysisReport, PipelineError> {
    let format = resolve_input(input, input_format, None);
    let parser = parser_for(format)?;
    let value = parser.parse(input)?;

    let shape = classify(&value);
    let recommended = recommend(&shape);
    let input_tokens = estimate_tokens(&String::from_utf8_lossy(input));

    let encodings = all_encoders()
        .iter()
        .map(|encoder| match encoder.encode(&value) {
            Ok(encoded) => {
                let tokens = estimate_tokens(&encoded.text);
                EncoderReport {
                    format: encoder.format_name(),
                    tokens: Some(tokens),
                    savings_vs_input: Some(savings(input_tokens, tokens)),
                    error: None,
                }
            }
            Err(err) => EncoderReport {
                format: encoder.format_name(),
                tokens: None,
                savings_vs_input: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    Ok(AnalysisReport {
        input_format: format,
        shape,
        recommended,
        input_tokens,
        encodings,
    })
}

/// Parse and classify without encoding.
pub fn detect_shape(input: &[u8], input_format: Option<Format>) -> Result<ShapeTag, PipelineError> {
    let format = resolve_input(input, input_format, None);
    let parser = parser_for(format)?;
    let value = parser.parse(input)?;
    Ok(classify(&value).shape)
}

fn resolve_input(input: &[u8], pinned: Option<Format>, filename: Option<&str>) -> Format {
    pinned.unwrap_or_else(|| detect(input, filename))
}
