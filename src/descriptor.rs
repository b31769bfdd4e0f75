use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Prop<'a> {
    /// The key does not exist.
    #[default]
    Absent,
    /// The key exists but holds `null` or `undefined`.
    Null,
    Bytes(Cow<'a, [u8]>),
    Number(f64),
    Text(String),
    Bool(bool),
    /// Any other host value (array, function, plain object, ...).
    Other,
}

impl<'a> From<&'a [u8]> for Prop<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Prop::Bytes(Cow::Borrowed(bytes))
    }
}

impl From<Vec<u8>> for Prop<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Prop::Bytes(Cow::Owned(bytes))
    }
}

impl From<f64> for Prop<'_> {
    fn from(n: f64) -> Self {
        Prop::Number(n)
    }
}

impl From<u32> for Prop<'_> {
    fn from(n: u32) -> Self {
        Prop::Number(n as f64)
    }
}

impl From<&str> for Prop<'_> {
    fn from(s: &str) -> Self {
        Prop::Text(s.to_string())
    }
}

impl From<bool> for Prop<'_> {
    fn from(b: bool) -> Self {
        Prop::Bool(b)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDescriptor<'a> {
    pub data: Prop<'a>,
    pub width: Prop<'a>,
    pub height: Prop<'a>,
    pub dtype: Prop<'a>,
    pub color_space: Prop<'a>,
    pub channels: Prop<'a>,
}

impl<'a> RawDescriptor<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        RawDescriptor {
            data: data.into(),
            width: width.into(),
            height: height.into(),
            ..Default::default()
        }
    }

    pub fn color_space(mut self, color_space: &str) -> Self {
        self.color_space = color_space.into();
        self
    }

    pub fn channels(mut self, channels: u32) -> Self {
        self.channels = channels.into();
        self
    }

    /// Legacy string form such as `"int8_RGB"`.
    pub fn channels_label(mut self, channels: &str) -> Self {
        self.channels = channels.into();
        self
    }

    pub fn dtype(mut self, dtype: &str) -> Self {
        self.dtype = dtype.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageDescriptor<'a> {
    Encoded(Cow<'a, [u8]>),
    Raw(RawDescriptor<'a>),
}

impl<'a> From<RawDescriptor<'a>> for ImageDescriptor<'a> {
    fn from(raw: RawDescriptor<'a>) -> Self {
        ImageDescriptor::Raw(raw)
    }
}

impl<'a> From<&'a [u8]> for ImageDescriptor<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ImageDescriptor::Encoded(Cow::Borrowed(bytes))
    }
}
