//! Field and method descriptor scanning.

use crate::error::{ParseError, Result};

/// Parsed form of a method descriptor such as `(I[JLjava/lang/String;)V`.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    pub parameters: Vec<String>,
    pub return_type: String,
}

fn read_token(chars: &[char], mut offset: usize, desc: &str) -> Result<(String, usize)> {
    let mut token = String::with_capacity(1);
    while offset < chars.len() && chars[offset] == '[' {
        token.push('[');
        offset += 1;
    }
    match chars.get(offset).copied() {
        Some(c @ ('B' | 'S' | 'I' | 'J' | 'F' | 'D' | 'C' | 'Z' | 'V')) => {
            token.push(c);
            offset += 1;
        }
        Some('L') => {
            while offset < chars.len() && chars[offset] != ';' {
                token.push(chars[offset]);
                offset += 1;
            }
            if offset == chars.len() {
                return Err(ParseError::BadDescriptor(desc.into()));
            }
            token.push(';');
            offset += 1;
        }
        _ => return Err(ParseError::BadDescriptor(desc.into())),
    }
    Ok((token, offset))
}

/// Scans a method descriptor into its parameter and return types.
pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let chars: Vec<char> = desc.chars().collect();
    if chars.first() != Some(&'(') {
        return Err(ParseError::BadDescriptor(desc.into()));
    }
    let mut parameters = Vec::new();
    let mut offset = 1;
    while offset < chars.len() && chars[offset] != ')' {
        let (token, next) = read_token(&chars, offset, desc)?;
        parameters.push(token);
        offset = next;
    }
    if chars.get(offset) != Some(&')') {
        return Err(ParseError::BadDescriptor(desc.into()));
    }
    let (return_type, _) = read_token(&chars, offset + 1, desc)?;
    Ok(MethodDescriptor { parameters, return_type })
}
