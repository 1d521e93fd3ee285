//! Client survey questionnaire: schema, draft state and submission payload.
//!
//! The questionnaire is a static list of steps. Field visibility depends on a
//! single discriminant, [`MeasurementType`], and derived areas are computed
//! from the raw room dimensions whenever that discriminant asks for it.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::domain::types::{
    BuilderId, ClientName, ContactPhone, TypeConstraintError, parse_decimal, parse_positive,
};

/// Maximum number of photos attached to one survey.
pub const MAX_PHOTOS: usize = 10;
/// Maximum size of a single photo in bytes.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
/// MIME types accepted for survey photos.
pub const ALLOWED_PHOTO_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Design style sent with every submission; the questionnaire does not ask for it.
pub const DEFAULT_DESIGN_STYLE: &str = "Modern";

/// Identifier of every input rendered by the questionnaire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    FullName,
    PhoneNumber,
    MeasurementType,
    TotalSize,
    Length,
    Width,
    Height,
    CalculatedAreas,
    PropertyType,
    HomeAge,
    TilePreference,
    IncludeTiles,
    ToiletMove,
    WallChange,
    Photos,
}

impl FieldId {
    /// Form field name used in templates and posted data.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldId::FullName => "full_name",
            FieldId::PhoneNumber => "phone_number",
            FieldId::MeasurementType => "measurement_type",
            FieldId::TotalSize => "total_size",
            FieldId::Length => "length",
            FieldId::Width => "width",
            FieldId::Height => "height",
            FieldId::CalculatedAreas => "calculated_areas",
            FieldId::PropertyType => "property_type",
            FieldId::HomeAge => "home_age",
            FieldId::TilePreference => "tile_preference",
            FieldId::IncludeTiles => "include_tiles",
            FieldId::ToiletMove => "toilet_move",
            FieldId::WallChange => "wall_change",
            FieldId::Photos => "photos",
        }
    }

    /// Short human readable name used in validation messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            FieldId::FullName => "Name",
            FieldId::PhoneNumber => "Contact number",
            FieldId::MeasurementType => "Measurement type",
            FieldId::TotalSize => "Total size",
            FieldId::Length => "Length",
            FieldId::Width => "Width",
            FieldId::Height => "Height",
            FieldId::CalculatedAreas => "Calculated areas",
            FieldId::PropertyType => "Property type",
            FieldId::HomeAge => "Age of home",
            FieldId::TilePreference => "Tile preference",
            FieldId::IncludeTiles => "Include tiles",
            FieldId::ToiletMove => "Toilet location",
            FieldId::WallChange => "Wall changes",
            FieldId::Photos => "Photos",
        }
    }
}

impl Display for FieldId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a radio or toggle field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
    pub sublabel: Option<&'static str>,
}

/// Generates a closed set of questionnaire answers backed by fixed strings.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($value:literal, $label:expr, $sublabel:expr)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Options in display order.
            pub const OPTIONS: &'static [ChoiceOption] = &[
                $(ChoiceOption { value: $value, label: $label, sublabel: $sublabel }),+
            ];

            /// Value posted by the form and stored in the draft.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($value => Ok($name::$variant),)+
                    other => Err(TypeConstraintError::InvalidValue(other.to_string())),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// How the client reports the bathroom size.
    MeasurementType {
        Direct => ("direct", "Enter total size directly", Some("If you know the total square meters")),
        Calculate => ("calculate", "Let us calculate it for you", Some("Enter individual measurements")),
        Dimensions => ("dimensions", "I have the room dimensions", Some("Length, width and ceiling height in meters")),
    }
}

impl MeasurementType {
    /// Measurement inputs that must be filled for this mode.
    pub const fn measurement_fields(self) -> &'static [FieldId] {
        match self {
            MeasurementType::Direct => &[FieldId::TotalSize],
            MeasurementType::Calculate | MeasurementType::Dimensions => {
                &[FieldId::Length, FieldId::Width, FieldId::Height]
            }
        }
    }

    /// Whether areas are derived from raw dimensions in this mode.
    pub const fn derives_areas(self) -> bool {
        match self {
            MeasurementType::Direct => false,
            MeasurementType::Calculate | MeasurementType::Dimensions => true,
        }
    }
}

impl Default for MeasurementType {
    fn default() -> Self {
        MeasurementType::Direct
    }
}

choice_enum! {
    /// Kind of property the bathroom belongs to.
    PropertyType {
        HouseOrUnit => ("House or Unit", "House or Unit", None),
        Apartment => ("Apartment", "Apartment", None),
        OtherNotSure => ("Other / Not sure", "Other / Not sure", None),
    }
}

impl PropertyType {
    /// Bathroom category understood by the estimate backend.
    pub const fn bathroom_type(self) -> &'static str {
        match self {
            PropertyType::HouseOrUnit => "Master Bathroom",
            PropertyType::Apartment | PropertyType::OtherNotSure => "Standard Bathroom",
        }
    }
}

choice_enum! {
    /// Age bracket of the home.
    HomeAge {
        UnderTen => ("Less than 10 years old", "Less than 10 years old", None),
        TenToThirty => ("10-30 years old", "10-30 years old", None),
        ThirtyToFifty => ("30-50 years old", "30-50 years old", None),
        OverFifty => ("Over 50 years old", "Over 50 years old", None),
        NotSure => ("Not sure", "Not sure", None),
    }
}

impl HomeAge {
    /// Age category understood by the estimate backend.
    pub const fn backend_category(self) -> &'static str {
        match self {
            HomeAge::UnderTen => "0-10 years",
            HomeAge::TenToThirty | HomeAge::NotSure => "10-20 years",
            HomeAge::ThirtyToFifty => "20-50 years",
            HomeAge::OverFifty => "50+ years",
        }
    }
}

choice_enum! {
    /// Tiling coverage level.
    TilePreference {
        Budget => ("budget", "Budget", Some("Tiles in wet areas only")),
        Standard => ("standard", "Standard", Some("Tiles in wet areas PLUS certain areas as feature wall")),
        Premium => ("premium", "Premium", Some("Floor to ceiling tiles")),
    }
}

impl TilePreference {
    /// Tiling level understood by the estimate backend.
    pub const fn tiling_level(self) -> &'static str {
        match self {
            TilePreference::Budget => "Budget",
            TilePreference::Standard => "Standard",
            TilePreference::Premium => "Premium",
        }
    }
}

choice_enum! {
    /// Whether tiles are part of the estimate.
    IncludeTiles {
        No => ("no", "No, thank you", Some("I will supply my own tiles")),
        Yes => ("yes", "Yes, please!", Some("Include in the estimate")),
    }
}

impl Default for IncludeTiles {
    fn default() -> Self {
        IncludeTiles::No
    }
}

choice_enum! {
    /// Whether the toilet changes location.
    ToiletMove {
        Stay => ("stay", "Toilet will remain the same location", None),
        Move => ("move", "Toilet will change location", Some("Moving plumbing may affect estimate accuracy and require additional consultation.")),
    }
}

choice_enum! {
    /// Whether walls are knocked down or shifted.
    WallChange {
        No => ("no", "No", None),
        Yes => ("yes", "Yes", Some("Structural changes may require additional permits and engineering consultation.")),
    }
}

/// Widget used to render a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Radio,
    RadioToggle,
    FileDrop,
    CalculatedDisplay,
}

/// Horizontal span of a field in the two column grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldWidth {
    Half,
    Full,
}

/// Static description of one questionnaire input.
#[derive(Debug)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: Option<&'static str>,
    pub options: &'static [ChoiceOption],
    /// Measurement modes in which the field is shown; `None` means always.
    pub visible_for: Option<&'static [MeasurementType]>,
    pub width: FieldWidth,
}

impl FieldDescriptor {
    /// Whether the field is rendered for the given draft.
    pub fn is_visible(&self, draft: &SurveyDraft) -> bool {
        match self.visible_for {
            None => true,
            Some(modes) => modes.contains(&draft.measurement_type),
        }
    }
}

/// A numbered group of fields.
#[derive(Debug)]
pub struct SurveyStep {
    pub number: u8,
    pub title: &'static str,
    pub fields: &'static [FieldDescriptor],
}

const DIMENSION_MODES: &[MeasurementType] =
    &[MeasurementType::Calculate, MeasurementType::Dimensions];

/// The questionnaire, in render order.
pub static SURVEY_STEPS: &[SurveyStep] = &[
    SurveyStep {
        number: 1,
        title: "Contact Information",
        fields: &[
            FieldDescriptor {
                id: FieldId::FullName,
                label: "Your Name *",
                kind: FieldKind::Text,
                placeholder: Some("Enter your full name"),
                options: &[],
                visible_for: None,
                width: FieldWidth::Half,
            },
            FieldDescriptor {
                id: FieldId::PhoneNumber,
                label: "Your Contact Number *",
                kind: FieldKind::Text,
                placeholder: Some("Enter your phone number"),
                options: &[],
                visible_for: None,
                width: FieldWidth::Half,
            },
        ],
    },
    SurveyStep {
        number: 2,
        title: "Bathroom Measurements",
        fields: &[
            FieldDescriptor {
                id: FieldId::MeasurementType,
                label: "",
                kind: FieldKind::RadioToggle,
                placeholder: None,
                options: MeasurementType::OPTIONS,
                visible_for: None,
                width: FieldWidth::Full,
            },
            FieldDescriptor {
                id: FieldId::TotalSize,
                label: "Total Size (square meters) *",
                kind: FieldKind::Text,
                placeholder: Some("e.g., 12.5"),
                options: &[],
                visible_for: Some(&[MeasurementType::Direct]),
                width: FieldWidth::Full,
            },
            FieldDescriptor {
                id: FieldId::Length,
                label: "Length (meters) *",
                kind: FieldKind::Text,
                placeholder: Some("e.g., 3.2"),
                options: &[],
                visible_for: Some(DIMENSION_MODES),
                width: FieldWidth::Half,
            },
            FieldDescriptor {
                id: FieldId::Width,
                label: "Width (meters) *",
                kind: FieldKind::Text,
                placeholder: Some("e.g., 2.4"),
                options: &[],
                visible_for: Some(DIMENSION_MODES),
                width: FieldWidth::Half,
            },
            FieldDescriptor {
                id: FieldId::Height,
                label: "Ceiling Height (meters) *",
                kind: FieldKind::Text,
                placeholder: Some("e.g., 2.7"),
                options: &[],
                visible_for: Some(DIMENSION_MODES),
                width: FieldWidth::Half,
            },
            FieldDescriptor {
                id: FieldId::CalculatedAreas,
                label: "Calculated Areas",
                kind: FieldKind::CalculatedDisplay,
                placeholder: None,
                options: &[],
                visible_for: Some(DIMENSION_MODES),
                width: FieldWidth::Full,
            },
        ],
    },
    SurveyStep {
        number: 3,
        title: "Property Details",
        fields: &[
            FieldDescriptor {
                id: FieldId::PropertyType,
                label: "Please select one option *",
                kind: FieldKind::Radio,
                placeholder: None,
                options: PropertyType::OPTIONS,
                visible_for: None,
                width: FieldWidth::Full,
            },
            FieldDescriptor {
                id: FieldId::HomeAge,
                label: "Age of Home *",
                kind: FieldKind::Radio,
                placeholder: None,
                options: HomeAge::OPTIONS,
                visible_for: None,
                width: FieldWidth::Full,
            },
        ],
    },
    SurveyStep {
        number: 4,
        title: "Tile Preference and Design Choices",
        fields: &[
            FieldDescriptor {
                id: FieldId::TilePreference,
                label: "Please select one option *",
                kind: FieldKind::Radio,
                placeholder: None,
                options: TilePreference::OPTIONS,
                visible_for: None,
                width: FieldWidth::Full,
            },
            FieldDescriptor {
                id: FieldId::IncludeTiles,
                label: "Would you like for the tiles to be included in the estimate? *",
                kind: FieldKind::RadioToggle,
                placeholder: None,
                options: IncludeTiles::OPTIONS,
                visible_for: None,
                width: FieldWidth::Full,
            },
        ],
    },
    SurveyStep {
        number: 5,
        title: "Structural Changes",
        fields: &[
            FieldDescriptor {
                id: FieldId::ToiletMove,
                label: "Will the toilet stay where it is, or be moved? *",
                kind: FieldKind::Radio,
                placeholder: None,
                options: ToiletMove::OPTIONS,
                visible_for: None,
                width: FieldWidth::Full,
            },
            FieldDescriptor {
                id: FieldId::WallChange,
                label: "Will you be knocking down or shifting a wall? *",
                kind: FieldKind::Radio,
                placeholder: None,
                options: WallChange::OPTIONS,
                visible_for: None,
                width: FieldWidth::Full,
            },
        ],
    },
    SurveyStep {
        number: 6,
        title: "Photo Upload",
        fields: &[FieldDescriptor {
            id: FieldId::Photos,
            label: "Please upload your photos (max 10 photos, no larger than 5MB per file)",
            kind: FieldKind::FileDrop,
            placeholder: None,
            options: &[],
            visible_for: None,
            width: FieldWidth::Full,
        }],
    },
];

/// Fields required regardless of the measurement mode.
const ALWAYS_REQUIRED: [FieldId; 8] = [
    FieldId::FullName,
    FieldId::PhoneNumber,
    FieldId::PropertyType,
    FieldId::HomeAge,
    FieldId::TilePreference,
    FieldId::IncludeTiles,
    FieldId::ToiletMove,
    FieldId::WallChange,
];

/// Floor, wall and total areas in square meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DerivedAreas {
    pub floor_area: f64,
    pub wall_area: f64,
    pub total_area: f64,
}

impl DerivedAreas {
    /// Computes the areas of a rectangular room.
    pub fn from_dimensions(length: f64, width: f64, height: f64) -> Self {
        let floor_area = length * width;
        let wall_area = 2.0 * (length * height) + 2.0 * (width * height);
        Self {
            floor_area,
            wall_area,
            total_area: floor_area + wall_area,
        }
    }
}

/// Derives the areas when the mode asks for it and every dimension is a
/// positive number; anything else leaves the areas unset.
pub fn derive_areas(
    mode: MeasurementType,
    length: &str,
    width: &str,
    height: &str,
) -> Option<DerivedAreas> {
    if !mode.derives_areas() {
        return None;
    }
    let length = parse_positive(length).ok()?;
    let width = parse_positive(width).ok()?;
    let height = parse_positive(height).ok()?;
    Some(DerivedAreas::from_dimensions(length, width, height))
}

/// In-memory photo chosen by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl PhotoFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Reasons a photo batch is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhotoError {
    #[error(
        "You can only upload a maximum of 10 files. You currently have {current} file(s). Please select {remaining} or fewer additional files."
    )]
    TooMany { current: usize, remaining: usize },
    #[error("Some files are larger than 5MB. Please choose smaller files.")]
    TooLarge,
    #[error("Please select only image files (PNG, JPG, GIF).")]
    InvalidType,
}

/// Ordered selection of survey photos.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhotoSelection {
    files: Vec<PhotoFile>,
}

impl PhotoSelection {
    /// Appends a batch of files, or refuses the whole batch leaving the
    /// selection untouched.
    pub fn accept(&mut self, batch: Vec<PhotoFile>) -> Result<(), PhotoError> {
        if self.files.len() + batch.len() > MAX_PHOTOS {
            return Err(PhotoError::TooMany {
                current: self.files.len(),
                remaining: MAX_PHOTOS.saturating_sub(self.files.len()),
            });
        }
        if batch.iter().any(|file| file.size() > MAX_PHOTO_BYTES) {
            return Err(PhotoError::TooLarge);
        }
        if batch
            .iter()
            .any(|file| !ALLOWED_PHOTO_TYPES.contains(&file.content_type.as_str()))
        {
            return Err(PhotoError::InvalidType);
        }
        self.files.extend(batch);
        Ok(())
    }

    /// Removes the file at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<PhotoFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[PhotoFile] {
        &self.files
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.file_name.as_str()).collect()
    }

    pub fn into_files(self) -> Vec<PhotoFile> {
        self.files
    }
}

/// Problems found while filling or submitting the questionnaire.
#[derive(Debug, Error, PartialEq)]
pub enum SurveyError {
    #[error("Please fill in all required fields. Missing: {}", join_fields(.0))]
    MissingFields(Vec<FieldId>),
    #[error("Invalid survey link: builder information is missing from the URL.")]
    InvalidLink,
    #[error("Invalid value for {}: {value}", .field.display_name())]
    InvalidChoice { field: FieldId, value: String },
    #[error("{} must be a number greater than zero.", .0.display_name())]
    InvalidMeasurement(FieldId),
    #[error(transparent)]
    Photo(#[from] PhotoError),
}

fn join_fields(fields: &[FieldId]) -> String {
    fields
        .iter()
        .map(|f| f.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Transient questionnaire state for one client.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurveyDraft {
    pub full_name: String,
    pub phone_number: String,
    pub measurement_type: MeasurementType,
    pub total_size: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub property_type: Option<PropertyType>,
    pub home_age: Option<HomeAge>,
    pub tile_preference: Option<TilePreference>,
    pub include_tiles: Option<IncludeTiles>,
    pub toilet_move: Option<ToiletMove>,
    pub wall_change: Option<WallChange>,
    pub derived: Option<DerivedAreas>,
    pub photos: PhotoSelection,
}

fn parse_choice<T: FromStr>(field: FieldId, value: &str) -> Result<Option<T>, SurveyError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse::<T>()
        .map(Some)
        .map_err(|_| SurveyError::InvalidChoice {
            field,
            value: value.to_string(),
        })
}

impl SurveyDraft {
    /// A fresh draft with toggles preselected on their first option.
    pub fn new() -> Self {
        Self {
            include_tiles: Some(IncludeTiles::default()),
            ..Self::default()
        }
    }

    /// Updates one field from its posted value. Derived areas follow any
    /// change to the measurement inputs.
    pub fn set(&mut self, field: FieldId, value: &str) -> Result<(), SurveyError> {
        match field {
            FieldId::FullName => self.full_name = value.to_string(),
            FieldId::PhoneNumber => self.phone_number = value.to_string(),
            FieldId::MeasurementType => {
                self.measurement_type = parse_choice(field, value)?.unwrap_or_default()
            }
            FieldId::TotalSize => self.total_size = value.to_string(),
            FieldId::Length => self.length = value.to_string(),
            FieldId::Width => self.width = value.to_string(),
            FieldId::Height => self.height = value.to_string(),
            FieldId::PropertyType => self.property_type = parse_choice(field, value)?,
            FieldId::HomeAge => self.home_age = parse_choice(field, value)?,
            FieldId::TilePreference => self.tile_preference = parse_choice(field, value)?,
            FieldId::IncludeTiles => self.include_tiles = parse_choice(field, value)?,
            FieldId::ToiletMove => self.toilet_move = parse_choice(field, value)?,
            FieldId::WallChange => self.wall_change = parse_choice(field, value)?,
            FieldId::CalculatedAreas | FieldId::Photos => {}
        }
        self.derived = derive_areas(self.measurement_type, &self.length, &self.width, &self.height);
        Ok(())
    }

    /// Current value of a field as rendered back into the form.
    pub fn value_of(&self, field: FieldId) -> Option<&str> {
        let value = match field {
            FieldId::FullName => self.full_name.as_str(),
            FieldId::PhoneNumber => self.phone_number.as_str(),
            FieldId::MeasurementType => self.measurement_type.as_str(),
            FieldId::TotalSize => self.total_size.as_str(),
            FieldId::Length => self.length.as_str(),
            FieldId::Width => self.width.as_str(),
            FieldId::Height => self.height.as_str(),
            FieldId::PropertyType => self.property_type?.as_str(),
            FieldId::HomeAge => self.home_age?.as_str(),
            FieldId::TilePreference => self.tile_preference?.as_str(),
            FieldId::IncludeTiles => self.include_tiles?.as_str(),
            FieldId::ToiletMove => self.toilet_move?.as_str(),
            FieldId::WallChange => self.wall_change?.as_str(),
            FieldId::CalculatedAreas | FieldId::Photos => return None,
        };
        (!value.trim().is_empty()).then_some(value)
    }

    /// Required fields for the active measurement mode, in form order.
    pub fn required_fields(&self) -> Vec<FieldId> {
        let mut fields = ALWAYS_REQUIRED.to_vec();
        fields.extend_from_slice(self.measurement_type.measurement_fields());
        fields
    }

    /// Required fields that are still empty.
    pub fn missing_fields(&self) -> Vec<FieldId> {
        self.required_fields()
            .into_iter()
            .filter(|field| self.value_of(*field).is_none())
            .collect()
    }

    /// Validates the draft and turns it into the submission payload.
    pub fn into_submission(self, builder_id: Option<BuilderId>) -> Result<NewClientSurvey, SurveyError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(SurveyError::MissingFields(missing));
        }
        let builder_id = builder_id.ok_or(SurveyError::InvalidLink)?;

        let missing_one = |field: FieldId| SurveyError::MissingFields(vec![field]);
        let client_name =
            ClientName::new(self.full_name.as_str()).map_err(|_| missing_one(FieldId::FullName))?;
        let client_phone = ContactPhone::new(self.phone_number.as_str())
            .map_err(|_| missing_one(FieldId::PhoneNumber))?;

        let (total_area, dimensions) = match self.measurement_type {
            MeasurementType::Direct => {
                let total = parse_decimal(&self.total_size)
                    .ok()
                    .filter(|v| *v > 0.0)
                    .ok_or(SurveyError::InvalidMeasurement(FieldId::TotalSize))?;
                (total, None)
            }
            MeasurementType::Calculate | MeasurementType::Dimensions => {
                let length = parse_positive(&self.length)
                    .map_err(|_| SurveyError::InvalidMeasurement(FieldId::Length))?;
                let width = parse_positive(&self.width)
                    .map_err(|_| SurveyError::InvalidMeasurement(FieldId::Width))?;
                let height = parse_positive(&self.height)
                    .map_err(|_| SurveyError::InvalidMeasurement(FieldId::Height))?;
                let areas = DerivedAreas::from_dimensions(length, width, height);
                (areas.total_area, Some((length, width, height, areas)))
            }
        };

        // All choices were checked by `missing_fields`.
        let property_type = self.property_type.ok_or_else(|| missing_one(FieldId::PropertyType))?;
        let home_age = self.home_age.ok_or_else(|| missing_one(FieldId::HomeAge))?;
        let tile_preference = self
            .tile_preference
            .ok_or_else(|| missing_one(FieldId::TilePreference))?;
        let include_tiles = self.include_tiles.ok_or_else(|| missing_one(FieldId::IncludeTiles))?;
        let toilet_move = self.toilet_move.ok_or_else(|| missing_one(FieldId::ToiletMove))?;
        let wall_change = self.wall_change.ok_or_else(|| missing_one(FieldId::WallChange))?;

        Ok(NewClientSurvey {
            builder_id,
            client_name,
            client_phone,
            total_area,
            floor_length: dimensions.map(|d| d.0),
            floor_width: dimensions.map(|d| d.1),
            wall_height: dimensions.map(|d| d.2),
            calculated_floor_area: dimensions.map(|d| d.3.floor_area),
            calculated_wall_area: dimensions.map(|d| d.3.wall_area),
            bathroom_type: property_type.bathroom_type(),
            tiling_level: tile_preference.tiling_level(),
            design_style: DEFAULT_DESIGN_STYLE,
            home_age_category: home_age.backend_category(),
            include_tiles,
            toilet_move,
            wall_change,
            photos: self.photos.into_files(),
        })
    }
}

/// Validated survey ready to be posted to the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct NewClientSurvey {
    pub builder_id: BuilderId,
    pub client_name: ClientName,
    pub client_phone: ContactPhone,
    pub total_area: f64,
    pub floor_length: Option<f64>,
    pub floor_width: Option<f64>,
    pub wall_height: Option<f64>,
    pub calculated_floor_area: Option<f64>,
    pub calculated_wall_area: Option<f64>,
    pub bathroom_type: &'static str,
    pub tiling_level: &'static str,
    pub design_style: &'static str,
    pub home_age_category: &'static str,
    pub include_tiles: IncludeTiles,
    pub toilet_move: ToiletMove,
    pub wall_change: WallChange,
    pub photos: Vec<PhotoFile>,
}

impl NewClientSurvey {
    /// Text parts of the multipart request; absent values are skipped.
    pub fn text_parts(&self) -> Vec<(&'static str, String)> {
        let mut parts = vec![
            ("client_name", self.client_name.to_string()),
            ("client_phone", self.client_phone.to_string()),
            ("total_area", self.total_area.to_string()),
        ];
        let optional = [
            ("floor_length", self.floor_length),
            ("floor_width", self.floor_width),
            ("wall_height", self.wall_height),
            ("calculated_floor_area", self.calculated_floor_area),
            ("calculated_wall_area", self.calculated_wall_area),
        ];
        parts.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.map(|v| (name, v.to_string()))),
        );
        parts.extend([
            ("bathroom_type", self.bathroom_type.to_string()),
            ("tiling_level", self.tiling_level.to_string()),
            ("design_style", self.design_style.to_string()),
            ("home_age_category", self.home_age_category.to_string()),
            ("include_tiles", self.include_tiles.to_string()),
            ("toilet_move", self.toilet_move.to_string()),
            ("wall_change", self.wall_change.to_string()),
        ]);
        parts
    }
}
