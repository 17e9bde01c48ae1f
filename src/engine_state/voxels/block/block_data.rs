//! # Block Data Module
//!
//! Parses block definition files into typed [`BlockData`] records.
//!
//! A definition file is line oriented. A line holding a key is followed by its
//! value: `Name` takes the whole next line, every other key takes whitespace
//! separated tokens from the next non-blank line.
//!
//! ```text
//! Name
//! Grass
//! ID
//! 1
//! Opaque
//! 1
//! Texture Top
//! 0 0
//! ```
//!
//! Blank and whitespace-only lines are skipped. Any other line that is not a
//! known key aborts the load.

use std::path::{Path, PathBuf};

use cgmath::Vector2;
use num_traits::FromPrimitive;
use phf::phf_map;

use super::block_type::{BlockState, BlockType, MeshStyle, MeshType};
use crate::core::CatalogError;

/// Directory block definition files are read from.
pub const BLOCK_DATA_DIRECTORY: &str = "Data/Blocks";
/// Extension of a block definition file.
pub const BLOCK_DATA_EXTENSION: &str = "block";

#[derive(Copy, Clone, Debug)]
enum BlockKey {
    Name,
    Id,
    Opaque,
    Obstacle,
    Update,
    MeshType,
    MeshStyle,
    State,
    TextureTop,
    TextureSide,
    TextureBottom,
}

static BLOCK_KEYS: phf::Map<&'static str, BlockKey> = phf_map! {
    "Name" => BlockKey::Name,
    "ID" => BlockKey::Id,
    "Opaque" => BlockKey::Opaque,
    "Obstacle" => BlockKey::Obstacle,
    "Update" => BlockKey::Update,
    "Mesht" => BlockKey::MeshType,
    "Style" => BlockKey::MeshStyle,
    "State" => BlockKey::State,
    "Texture Top" => BlockKey::TextureTop,
    "Texture Side" => BlockKey::TextureSide,
    "Texture Bottom" => BlockKey::TextureBottom,
};

/// The properties of one block type, as read from its definition file.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockData {
    pub name: String,
    pub id: BlockType,
    /// Opaque blocks hide the faces of their neighbours.
    pub is_opaque: bool,
    /// Obstacles collide with the player.
    pub is_obstacle: bool,
    /// Whether the block wants updates when its neighbours change.
    pub can_update: bool,
    pub mesh_type: MeshType,
    pub mesh_style: MeshStyle,
    pub state: BlockState,
    /// Texture atlas cell for the top face.
    pub top_texture_coords: Vector2<i32>,
    /// Texture atlas cell for the four side faces.
    pub side_texture_coords: Vector2<i32>,
    /// Texture atlas cell for the bottom face.
    pub bottom_texture_coords: Vector2<i32>,
}

impl BlockData {
    /// A record with every property at its default, used for built-in
    /// definitions and as the starting point of a parse.
    pub fn new(name: &str, id: BlockType) -> Self {
        BlockData {
            name: name.to_owned(),
            id,
            is_opaque: false,
            is_obstacle: false,
            can_update: false,
            mesh_type: MeshType::SOLID,
            mesh_style: MeshStyle::BLOCK,
            state: BlockState::SOLID,
            top_texture_coords: Vector2::new(0, 0),
            side_texture_coords: Vector2::new(0, 0),
            bottom_texture_coords: Vector2::new(0, 0),
        }
    }

    /// Path of the definition file for `name` under `directory`.
    pub fn file_path(directory: &Path, name: &str) -> PathBuf {
        directory.join(name).with_extension(BLOCK_DATA_EXTENSION)
    }

    /// Loads `Data/Blocks/<name>.block`.
    pub fn load(name: &str) -> Result<Self, CatalogError> {
        Self::load_from(Path::new(BLOCK_DATA_DIRECTORY), name)
    }

    /// Loads `<directory>/<name>.block`.
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] if the file cannot be read, and any parse
    /// error reported by [`BlockData::parse`].
    pub fn load_from(directory: &Path, name: &str) -> Result<Self, CatalogError> {
        let path = Self::file_path(directory, name);
        let source = std::fs::read_to_string(&path)
            .map_err(|source| CatalogError::Io { path, source })?;
        Self::parse(name, &source)
    }

    /// Parses the contents of a definition file. `name` is only used in
    /// error messages and as the default display name.
    pub fn parse(name: &str, source: &str) -> Result<Self, CatalogError> {
        let mut data = BlockData::new(name, BlockType::AIR);
        let mut has_id = false;
        let mut lines = source.lines();

        while let Some(line) = lines.next() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let key = *BLOCK_KEYS
                .get(line)
                .ok_or_else(|| CatalogError::UnrecognisedToken {
                    token: line.to_owned(),
                    name: name.to_owned(),
                })?;

            let mut reader = ValueReader {
                lines: &mut lines,
                name,
            };

            match key {
                BlockKey::Name => data.name = reader.line("Name")?,
                BlockKey::Id => {
                    let id = reader.integer("ID")?;
                    data.id = BlockType::from_id(id).ok_or_else(|| CatalogError::InvalidValue {
                        key: "ID",
                        value: id.to_string(),
                        name: name.to_owned(),
                    })?;
                    has_id = true;
                }
                BlockKey::Opaque => data.is_opaque = reader.boolean("Opaque")?,
                BlockKey::Obstacle => data.is_obstacle = reader.boolean("Obstacle")?,
                BlockKey::Update => data.can_update = reader.boolean("Update")?,
                BlockKey::MeshType => data.mesh_type = reader.enumeration("Mesht")?,
                BlockKey::MeshStyle => data.mesh_style = reader.enumeration("Style")?,
                BlockKey::State => data.state = reader.enumeration("State")?,
                BlockKey::TextureTop => data.top_texture_coords = reader.coords("Texture Top")?,
                BlockKey::TextureSide => {
                    data.side_texture_coords = reader.coords("Texture Side")?
                }
                BlockKey::TextureBottom => {
                    data.bottom_texture_coords = reader.coords("Texture Bottom")?
                }
            }
        }

        if !has_id {
            return Err(CatalogError::MissingId {
                name: name.to_owned(),
            });
        }

        Ok(data)
    }
}

/// Pulls the value lines that follow a key.
struct ValueReader<'a, 'b, I: Iterator<Item = &'b str>> {
    lines: &'a mut I,
    name: &'a str,
}

impl<'b, I: Iterator<Item = &'b str>> ValueReader<'_, 'b, I> {
    fn line(&mut self, key: &'static str) -> Result<String, CatalogError> {
        self.lines
            .next()
            .map(|line| line.trim().to_owned())
            .ok_or_else(|| self.missing(key))
    }

    fn tokens(&mut self, key: &'static str, count: usize) -> Result<Vec<&'b str>, CatalogError> {
        let line = loop {
            match self.lines.next() {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
                None => return Err(self.missing(key)),
            }
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != count {
            return Err(self.invalid(key, line));
        }
        Ok(tokens)
    }

    fn integer(&mut self, key: &'static str) -> Result<i64, CatalogError> {
        let token = self.tokens(key, 1)?[0];
        token.parse().map_err(|_| self.invalid(key, token))
    }

    fn boolean(&mut self, key: &'static str) -> Result<bool, CatalogError> {
        match self.tokens(key, 1)?[0] {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(self.invalid(key, other)),
        }
    }

    fn enumeration<E: FromPrimitive>(&mut self, key: &'static str) -> Result<E, CatalogError> {
        let value = self.integer(key)?;
        E::from_i64(value).ok_or_else(|| self.invalid(key, &value.to_string()))
    }

    fn coords(&mut self, key: &'static str) -> Result<Vector2<i32>, CatalogError> {
        let tokens = self.tokens(key, 2)?;
        let x = tokens[0].parse().map_err(|_| self.invalid(key, tokens[0]))?;
        let y = tokens[1].parse().map_err(|_| self.invalid(key, tokens[1]))?;
        Ok(Vector2::new(x, y))
    }

    fn missing(&self, key: &'static str) -> CatalogError {
        CatalogError::MissingValue {
            key,
            name: self.name.to_owned(),
        }
    }

    fn invalid(&self, key: &'static str, value: &str) -> CatalogError {
        CatalogError::InvalidValue {
            key,
            value: value.to_owned(),
            name: self.name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GRASS: &str = "Name\nGrass\nID\n1\nOpaque\n1\nObstacle\n1\nUpdate\n0\n\n\
                         Mesht\n0\nStyle\n0\nState\n0\n \nTexture Top\n0 0\n\t\n\
                         Texture Side\n1 0\nTexture Bottom\n2 0\n";

    #[test]
    fn test_parse_full_record() {
        let data = BlockData::parse("grass", GRASS).unwrap();

        assert_eq!(data.name, "Grass");
        assert_eq!(data.id, BlockType::GRASS);
        assert!(data.is_opaque);
        assert!(data.is_obstacle);
        assert!(!data.can_update);
        assert_eq!(data.mesh_type, MeshType::SOLID);
        assert_eq!(data.mesh_style, MeshStyle::BLOCK);
        assert_eq!(data.state, BlockState::SOLID);
        assert_eq!(data.top_texture_coords, Vector2::new(0, 0));
        assert_eq!(data.side_texture_coords, Vector2::new(1, 0));
        assert_eq!(data.bottom_texture_coords, Vector2::new(2, 0));
    }

    #[test]
    fn test_parse_enum_values() {
        let source = "ID\n9\nMesht\n1\nStyle\n1\nState\n2\n";
        let data = BlockData::parse("rose", source).unwrap();

        assert_eq!(data.id, BlockType::ROSE);
        assert_eq!(data.mesh_type, MeshType::FLORA);
        assert_eq!(data.mesh_style, MeshStyle::X_STYLE);
        assert_eq!(data.state, BlockState::GAS);
    }

    #[test]
    fn test_unknown_key_is_fatal() {
        let err = BlockData::parse("bad", "ID\n1\nColour\nred\n").unwrap_err();
        match err {
            CatalogError::UnrecognisedToken { token, name } => {
                assert_eq!(token, "Colour");
                assert_eq!(name, "bad");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values_are_fatal() {
        assert!(matches!(
            BlockData::parse("bad", "ID\n1\nOpaque\nmaybe\n"),
            Err(CatalogError::InvalidValue { key: "Opaque", .. })
        ));
        assert!(matches!(
            BlockData::parse("bad", "ID\n1\nState\n9\n"),
            Err(CatalogError::InvalidValue { key: "State", .. })
        ));
        assert!(matches!(
            BlockData::parse("bad", "ID\n1\nTexture Top\n3\n"),
            Err(CatalogError::InvalidValue { key: "Texture Top", .. })
        ));
        assert!(matches!(
            BlockData::parse("bad", "ID\n1\nOpaque\n1 0\n"),
            Err(CatalogError::InvalidValue { key: "Opaque", .. })
        ));
        assert!(matches!(
            BlockData::parse("bad", "ID\n1\nTexture Side\n1 0 4\n"),
            Err(CatalogError::InvalidValue { key: "Texture Side", .. })
        ));
        assert!(matches!(
            BlockData::parse("bad", "ID\n"),
            Err(CatalogError::MissingValue { key: "ID", .. })
        ));
    }

    #[test]
    fn test_missing_id_is_fatal() {
        assert!(matches!(
            BlockData::parse("anon", "Name\nAnon\n"),
            Err(CatalogError::MissingId { .. })
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("grass.block")).unwrap();
        file.write_all(GRASS.as_bytes()).unwrap();

        let data = BlockData::load_from(dir.path(), "grass").unwrap();
        assert_eq!(data.id, BlockType::GRASS);

        let missing = BlockData::load_from(dir.path(), "stone").unwrap_err();
        match missing {
            CatalogError::Io { path, .. } => assert!(path.ends_with("stone.block")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
