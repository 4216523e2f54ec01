//! Parser for mapper definition strings.
//!
//! The grammar is a small regular language describing element mapper
//! expressions:
//!
//! ```text
//! expr      := type [ '(' paramlist ')' ]
//! paramlist := expr (',' expr)* | literal (',' literal)*
//! type      := Axis | Button | Pov | DigitalAxis | Invert | Split |
//!              Compound | Keyboard | MouseAxis | MouseButton | Null
//! ```
//!
//! Type names are case-insensitive and common synonyms are accepted
//! (`Keystroke` for `Keyboard`, axis aliases like `RX`/`RotX`, direction
//! aliases like `+`/`pos`/`bidir`). Nesting is limited to
//! [`ELEMENT_MAPPER_MAX_DEPTH`](openpad_mapper::ELEMENT_MAPPER_MAX_DEPTH)
//! levels. Force-feedback actuator strings use the same surface syntax with
//! the `Disabled`, `SingleAxis`, `MagnitudeProjection`, and `Default` types
//! and no nesting.
//!
//! # Examples
//!
//! ```
//! use openpad_parser::parse_element_mapper;
//! use openpad_mapper::{AxisDirection, ElementMapper};
//! use openpad_types::element::Axis;
//!
//! let mapper = parse_element_mapper("Axis(RotY, +)")?;
//! assert_eq!(
//!     mapper,
//!     ElementMapper::Axis { axis: Axis::RotY, direction: AxisDirection::Positive },
//! );
//!
//! let nested = parse_element_mapper("Split(Button(1), Invert(Axis(Z)))")?;
//! assert!(matches!(nested, ElementMapper::Split { .. }));
//! # Ok::<(), openpad_errors::ParseError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]

pub mod scancode;

use openpad_errors::ParseError;
use openpad_mapper::{
    ActuatorElement, AxisDirection, ElementMapper, COMPOUND_MAPPER_MAX_CHILDREN,
    ELEMENT_MAPPER_MAX_DEPTH,
};
use openpad_types::element::{Axis, Button, PovDirection, BUTTON_COUNT_MAX};
use openpad_types::host::{MouseAxis, MouseButton};
use tracing::debug;

pub use scancode::{scancode_by_name, SCANCODE_COUNT};

/// Parses one element mapper expression.
pub fn parse_element_mapper(input: &str) -> Result<ElementMapper, ParseError> {
    let depth = recursion_depth(input)?;
    if depth > ELEMENT_MAPPER_MAX_DEPTH {
        let error = ParseError::NestingTooDeep {
            depth,
            max: ELEMENT_MAPPER_MAX_DEPTH,
        };
        debug!(input, %error, "rejected element mapper string");
        return Err(error);
    }
    parse_expr(input)
}

/// Parses one force-feedback actuator element description. Nesting is not
/// allowed for actuators.
pub fn parse_actuator_element(input: &str) -> Result<ActuatorElement, ParseError> {
    let depth = recursion_depth(input)?;
    if depth > 1 {
        return Err(ParseError::syntax(
            "nesting is not allowed for force feedback actuators",
        ));
    }

    let (name, params) = split_type_and_params(input)?;
    match name.to_ascii_lowercase().as_str() {
        "disabled" | "off" => {
            expect_no_params(&name, params)?;
            Ok(ActuatorElement::Disabled)
        }
        "default" => {
            expect_no_params(&name, params)?;
            Ok(openpad_mapper::DEFAULT_MOTOR_ACTUATOR)
        }
        "singleaxis" => {
            let params = split_params(params.unwrap_or(""))?;
            let (axis, direction) = parse_axis_params(&params)?;
            Ok(ActuatorElement::SingleAxis { axis, direction })
        }
        "magnitudeprojection" => {
            let params = split_params(params.unwrap_or(""))?;
            let [first, second] = params.as_slice() else {
                return Err(ParseError::invalid_parameter(
                    "magnitude projection requires exactly two axes",
                ));
            };
            let first = parse_axis_name(first)?;
            let second = parse_axis_name(second)?;
            if first == second {
                return Err(ParseError::invalid_parameter(
                    "magnitude projection axes must be distinct",
                ));
            }
            Ok(ActuatorElement::MagnitudeProjection { first, second })
        }
        _ => Err(ParseError::UnknownType {
            name: name.to_string(),
        }),
    }
}

/// Computes the parenthesis nesting depth of a mapper string, or fails on
/// imbalance.
pub fn recursion_depth(input: &str) -> Result<u32, ParseError> {
    let mut depth = 0u32;
    let mut max_depth = 0u32;

    for character in input.chars() {
        match character {
            '(' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ParseError::syntax(format!("unbalanced parentheses in \"{input}\""))
                })?;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::syntax(format!(
            "unbalanced parentheses in \"{input}\""
        )));
    }
    Ok(max_depth)
}

fn parse_expr(input: &str) -> Result<ElementMapper, ParseError> {
    let (name, params) = split_type_and_params(input)?;

    match name.to_ascii_lowercase().as_str() {
        "axis" => {
            let params = split_params(params.unwrap_or(""))?;
            let (axis, direction) = parse_axis_params(&params)?;
            Ok(ElementMapper::Axis { axis, direction })
        }
        "digitalaxis" => {
            let params = split_params(params.unwrap_or(""))?;
            let (axis, direction) = parse_axis_params(&params)?;
            Ok(ElementMapper::DigitalAxis { axis, direction })
        }
        "button" => {
            let params = split_params(params.unwrap_or(""))?;
            let [number] = params.as_slice() else {
                return Err(ParseError::invalid_parameter(
                    "button requires exactly one parameter",
                ));
            };
            let number = parse_unsigned(number)?;
            if number < 1 || number > BUTTON_COUNT_MAX as u32 {
                return Err(ParseError::invalid_parameter(format!(
                    "{number}: button number out of range"
                )));
            }
            let button = Button::new((number - 1) as u8).ok_or_else(|| {
                ParseError::invalid_parameter(format!("{number}: button number out of range"))
            })?;
            Ok(ElementMapper::Button(button))
        }
        "pov" | "povhat" => {
            let params = split_params(params.unwrap_or(""))?;
            let [direction] = params.as_slice() else {
                return Err(ParseError::invalid_parameter(
                    "pov requires exactly one direction parameter",
                ));
            };
            Ok(ElementMapper::Pov(parse_pov_direction(direction)?))
        }
        "keyboard" | "keystroke" => {
            let params = split_params(params.unwrap_or(""))?;
            let [key] = params.as_slice() else {
                return Err(ParseError::invalid_parameter(
                    "keyboard requires exactly one scancode parameter",
                ));
            };
            let scancode = parse_scancode(key)?;
            Ok(ElementMapper::Keyboard { scancode })
        }
        "mouseaxis" => {
            let params = split_params(params.unwrap_or(""))?;
            let (axis, direction) = parse_mouse_axis_params(&params)?;
            Ok(ElementMapper::MouseAxis { axis, direction })
        }
        "mousebutton" => {
            let params = split_params(params.unwrap_or(""))?;
            let [button] = params.as_slice() else {
                return Err(ParseError::invalid_parameter(
                    "mouse button requires exactly one parameter",
                ));
            };
            Ok(ElementMapper::MouseButton(parse_mouse_button(button)?))
        }
        "invert" => {
            let params = split_params(params.unwrap_or(""))?;
            let [inner] = params.as_slice() else {
                return Err(ParseError::invalid_parameter(
                    "invert requires exactly one element mapper parameter",
                ));
            };
            Ok(ElementMapper::Invert(Box::new(parse_expr(inner)?)))
        }
        "split" => {
            let params = split_params(params.unwrap_or(""))?;
            let [positive, negative] = params.as_slice() else {
                return Err(ParseError::invalid_parameter(
                    "split requires exactly two element mapper parameters",
                ));
            };
            Ok(ElementMapper::Split {
                positive: Box::new(parse_expr(positive)?),
                negative: Box::new(parse_expr(negative)?),
            })
        }
        "compound" => {
            let params = split_params(params.unwrap_or(""))?;
            if params.is_empty() || params.len() > COMPOUND_MAPPER_MAX_CHILDREN {
                return Err(ParseError::invalid_parameter(format!(
                    "compound requires between 1 and {COMPOUND_MAPPER_MAX_CHILDREN} element mappers"
                )));
            }
            let children = params
                .iter()
                .map(|child| parse_expr(child))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ElementMapper::Compound(children))
        }
        "null" | "nothing" => {
            expect_no_params(&name, params)?;
            Ok(ElementMapper::Null)
        }
        _ => {
            let error = ParseError::UnknownType {
                name: name.to_string(),
            };
            debug!(input, %error, "rejected element mapper string");
            Err(error)
        }
    }
}

/// Splits `Type(params)` into the type name and the raw parameter text.
/// Returns `None` parameters when no parenthesis is present.
fn split_type_and_params(input: &str) -> Result<(String, Option<&str>), ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::syntax("empty element mapper string"));
    }

    let Some(open) = trimmed.find('(') else {
        if trimmed.contains(')') || trimmed.contains(',') {
            return Err(ParseError::syntax(format!(
                "unexpected separator in \"{trimmed}\""
            )));
        }
        return Ok((trimmed.to_string(), None));
    };

    let name = trimmed[..open].trim();
    if name.is_empty() {
        return Err(ParseError::syntax(format!(
            "missing type name in \"{trimmed}\""
        )));
    }

    let rest = &trimmed[open + 1..];
    let close = find_matching_close(rest).ok_or_else(|| {
        ParseError::syntax(format!("unbalanced parentheses in \"{trimmed}\""))
    })?;
    if !rest[close + 1..].trim().is_empty() {
        return Err(ParseError::syntax(format!(
            "\"{}\" is extraneous",
            rest[close + 1..].trim()
        )));
    }

    Ok((name.to_string(), Some(&rest[..close])))
}

/// Position of the parenthesis closing a parameter list whose opening
/// parenthesis has already been consumed.
fn find_matching_close(input: &str) -> Option<usize> {
    let mut depth = 1u32;
    for (position, character) in input.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(position);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits a parameter list at top-level commas, trimming each piece.
fn split_params(input: &str) -> Result<Vec<&str>, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::invalid_parameter("empty parameter list"));
    }

    let mut params = Vec::new();
    let mut depth = 0u32;
    let mut start = 0usize;
    for (position, character) in trimmed.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ParseError::syntax(format!("unbalanced parentheses in \"{trimmed}\""))
                })?;
            }
            ',' if depth == 0 => {
                params.push(trimmed[start..position].trim());
                start = position + 1;
            }
            _ => {}
        }
    }
    params.push(trimmed[start..].trim());

    if params.iter().any(|param| param.is_empty()) {
        return Err(ParseError::syntax(format!(
            "dangling or empty parameter in \"{trimmed}\""
        )));
    }
    Ok(params)
}

fn expect_no_params(name: &str, params: Option<&str>) -> Result<(), ParseError> {
    match params {
        None => Ok(()),
        Some(params) if params.trim().is_empty() => Ok(()),
        Some(params) => Err(ParseError::invalid_parameter(format!(
            "\"{}\" is extraneous for {name}",
            params.trim()
        ))),
    }
}

fn parse_axis_params(params: &[&str]) -> Result<(Axis, AxisDirection), ParseError> {
    match params {
        [axis] => Ok((parse_axis_name(axis)?, AxisDirection::Both)),
        [axis, direction] => Ok((parse_axis_name(axis)?, parse_axis_direction(direction)?)),
        _ => Err(ParseError::invalid_parameter(
            "axis requires an axis name and an optional direction",
        )),
    }
}

fn parse_axis_name(name: &str) -> Result<Axis, ParseError> {
    match name.to_ascii_lowercase().as_str() {
        "x" => Ok(Axis::X),
        "y" => Ok(Axis::Y),
        "z" => Ok(Axis::Z),
        "rx" | "rotx" => Ok(Axis::RotX),
        "ry" | "roty" => Ok(Axis::RotY),
        "rz" | "rotz" => Ok(Axis::RotZ),
        _ => Err(ParseError::invalid_parameter(format!(
            "{name}: unrecognized axis"
        ))),
    }
}

fn parse_axis_direction(direction: &str) -> Result<AxisDirection, ParseError> {
    match direction.to_ascii_lowercase().as_str() {
        "both" | "bidir" | "bidirectional" => Ok(AxisDirection::Both),
        "+" | "+ve" | "pos" | "positive" => Ok(AxisDirection::Positive),
        "-" | "-ve" | "neg" | "negative" => Ok(AxisDirection::Negative),
        _ => Err(ParseError::invalid_parameter(format!(
            "{direction}: unrecognized axis direction"
        ))),
    }
}

fn parse_pov_direction(direction: &str) -> Result<PovDirection, ParseError> {
    match direction.to_ascii_lowercase().as_str() {
        "up" | "u" | "north" | "n" => Ok(PovDirection::Up),
        "down" | "dn" | "d" | "south" | "s" => Ok(PovDirection::Down),
        "left" | "lt" | "l" | "west" | "w" => Ok(PovDirection::Left),
        "right" | "rt" | "r" | "east" | "e" => Ok(PovDirection::Right),
        _ => Err(ParseError::invalid_parameter(format!(
            "{direction}: unrecognized POV direction"
        ))),
    }
}

fn parse_mouse_axis_params(params: &[&str]) -> Result<(MouseAxis, AxisDirection), ParseError> {
    let (axis, direction) = match params {
        [axis] => (*axis, AxisDirection::Both),
        [axis, direction] => (*axis, parse_axis_direction(direction)?),
        _ => {
            return Err(ParseError::invalid_parameter(
                "mouse axis requires an axis name and an optional direction",
            ));
        }
    };

    let axis = match axis.to_ascii_lowercase().as_str() {
        "x" | "h" | "horiz" | "horizontal" => MouseAxis::X,
        "y" | "v" | "vert" | "vertical" => MouseAxis::Y,
        "wheelh" | "wheelx" | "wheelhorizontal" => MouseAxis::WheelHorizontal,
        "wheelv" | "wheely" | "wheelvertical" => MouseAxis::WheelVertical,
        _ => {
            return Err(ParseError::invalid_parameter(format!(
                "{axis}: unrecognized mouse axis"
            )));
        }
    };
    Ok((axis, direction))
}

fn parse_mouse_button(button: &str) -> Result<MouseButton, ParseError> {
    match button.to_ascii_lowercase().as_str() {
        "left" => Ok(MouseButton::Left),
        "middle" | "wheel" => Ok(MouseButton::Middle),
        "right" => Ok(MouseButton::Right),
        "x1" | "back" => Ok(MouseButton::X1),
        "x2" | "forward" => Ok(MouseButton::X2),
        _ => Err(ParseError::invalid_parameter(format!(
            "{button}: unrecognized mouse button"
        ))),
    }
}

fn parse_scancode(key: &str) -> Result<u16, ParseError> {
    if let Some(code) = scancode_by_name(key) {
        return Ok(code);
    }

    let number = parse_unsigned(key)?;
    if number >= SCANCODE_COUNT as u32 {
        return Err(ParseError::invalid_parameter(format!(
            "{key}: scancode out of range"
        )));
    }
    Ok(number as u16)
}

/// Parses a small unsigned integer. Hex (`0x`) and octal (`0`) prefixes are
/// auto-detected; at most eight characters are accepted so parsed values
/// always fit in 32 bits.
fn parse_unsigned(text: &str) -> Result<u32, ParseError> {
    const MAX_CHARS: usize = 8;

    let text = text.trim();
    if text.is_empty() || text.len() > MAX_CHARS {
        return Err(ParseError::invalid_parameter(format!(
            "{text}: not an unsigned integer"
        )));
    }

    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    u32::from_str_radix(digits, radix).map_err(|_| {
        ParseError::invalid_parameter(format!("{text}: not an unsigned integer"))
    })
}
