// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    MemberCountError(usize),
    NoFileError(String),
    TaskArrayError(String),
    ArchiveError(String),
    DirError(String),
    ReadError(String),
    WriteError(String),
    OtherError(String),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MergeError::MemberCountError(count) => {
                write!(
                    f,
                    "[annomerge::MemberCountError] Team size must be between 2 and 4 members, got {}.",
                    count
                )
            }
            MergeError::NoFileError(message) => {
                write!(
                    f,
                    "[annomerge::NoFileError] File could not be found. {}.",
                    message
                )
            }
            MergeError::TaskArrayError(message) => {
                write!(
                    f,
                    "[annomerge::TaskArrayError] Input is not a Label Studio task array. {}.",
                    message
                )
            }
            MergeError::ArchiveError(message) => {
                write!(
                    f,
                    "[annomerge::ArchiveError] Archive could not be read. {}.",
                    message
                )
            }
            MergeError::DirError(message) => {
                write!(
                    f,
                    "[annomerge::DirError] Directory could not be prepared. {}.",
                    message
                )
            }
            MergeError::ReadError(message) => {
                write!(f, "[annomerge::ReadError] Failed to read file. {}.", message)
            }
            MergeError::WriteError(message) => {
                write!(f, "[annomerge::WriteError] Failed to write file. {}.", message)
            }
            MergeError::OtherError(message) => {
                write!(f, "[annomerge::OtherError] Error: {}.", message)
            }
        }
    }
}

impl std::error::Error for MergeError {}
