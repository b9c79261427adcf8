use crate::engine::Engine;
use crate::errors::GatherlyError;
use crate::schema::Entity;
use bson::{Bson, Document as BsonDocument};
use std::collections::HashMap;
use std::time::Instant;

use super::eval::{apply_op, compare_docs, get_path, values_equal};
use super::telemetry;

/// Runs a compiled pipeline against the entity's collection, stage by
/// stage, in the exact order given. The interpreter covers the stage
/// vocabulary the compiler emits; anything else is a query error.
pub fn run_pipeline(
    engine: &Engine,
    entity: Entity,
    pipeline: &[BsonDocument],
) -> Result<Vec<BsonDocument>, GatherlyError> {
    let started = Instant::now();
    let col = engine
        .get_collection(entity.collection())
        .ok_or_else(|| GatherlyError::NoSuchCollection(entity.collection().to_string()))?;
    let mut docs = col.documents();
    for stage in pipeline {
        docs = apply_stage(engine, docs, stage)?;
    }
    telemetry::record_query(entity.collection(), started.elapsed(), docs.len());
    Ok(docs)
}

fn apply_stage(
    engine: &Engine,
    mut docs: Vec<BsonDocument>,
    stage: &BsonDocument,
) -> Result<Vec<BsonDocument>, GatherlyError> {
    let mut entries = stage.iter();
    let Some((op, spec)) = entries.next() else {
        return Err(GatherlyError::Query("empty pipeline stage".into()));
    };
    if entries.next().is_some() {
        return Err(GatherlyError::Query(format!("pipeline stage has extra operators: {stage}")));
    }
    match op.as_str() {
        "$lookup" => apply_lookup(engine, docs, spec_document(op, spec)?),
        "$addFields" => apply_add_fields(docs, spec_document(op, spec)?),
        "$match" => apply_match(docs, spec_document(op, spec)?),
        "$sort" => {
            let keys = spec_document(op, spec)?;
            docs.sort_by(|a, b| compare_docs(a, b, keys));
            Ok(docs)
        }
        "$skip" => {
            let n = stage_count(op, spec)?;
            if n >= docs.len() {
                return Ok(Vec::new());
            }
            Ok(docs.split_off(n))
        }
        "$limit" => {
            let n = stage_count(op, spec)?;
            docs.truncate(n);
            Ok(docs)
        }
        other => Err(GatherlyError::Query(format!("unsupported pipeline stage: {other}"))),
    }
}

fn spec_document<'a>(op: &str, spec: &'a Bson) -> Result<&'a BsonDocument, GatherlyError> {
    spec.as_document().ok_or_else(|| GatherlyError::Query(format!("{op} expects a document")))
}

fn stage_count(op: &str, spec: &Bson) -> Result<usize, GatherlyError> {
    let n = match *spec {
        Bson::Int32(n) if n >= 0 => n as usize,
        Bson::Int64(n) if n >= 0 => usize::try_from(n).unwrap_or(usize::MAX),
        _ => return Err(GatherlyError::Query(format!("{op} expects a non-negative integer"))),
    };
    Ok(n)
}

/// Id-array join: replaces (or materializes) the `as` field with the
/// foreign documents whose `foreignField` value appears in the local id
/// array, in id order.
fn apply_lookup(
    engine: &Engine,
    mut docs: Vec<BsonDocument>,
    spec: &BsonDocument,
) -> Result<Vec<BsonDocument>, GatherlyError> {
    let from = lookup_str(spec, "from")?;
    let local_field = lookup_str(spec, "localField")?;
    let foreign_field = lookup_str(spec, "foreignField")?;
    let as_field = lookup_str(spec, "as")?;
    let foreign = engine
        .get_collection(from)
        .ok_or_else(|| GatherlyError::NoSuchCollection(from.to_string()))?;
    let foreign_docs = foreign.documents();
    for doc in &mut docs {
        let keys: Vec<Bson> = match doc.get(local_field) {
            Some(Bson::Array(items)) => items.clone(),
            Some(Bson::Null) | None => Vec::new(),
            Some(other) => vec![other.clone()],
        };
        let mut joined = Vec::new();
        for key in &keys {
            for fd in &foreign_docs {
                if fd.get(foreign_field).is_some_and(|v| values_equal(v, key)) {
                    joined.push(Bson::Document(fd.clone()));
                }
            }
        }
        doc.insert(as_field, Bson::Array(joined));
    }
    Ok(docs)
}

fn lookup_str<'a>(spec: &'a BsonDocument, key: &str) -> Result<&'a str, GatherlyError> {
    spec.get_str(key).map_err(|_| GatherlyError::Query(format!("$lookup missing {key}")))
}

fn apply_add_fields(
    mut docs: Vec<BsonDocument>,
    spec: &BsonDocument,
) -> Result<Vec<BsonDocument>, GatherlyError> {
    let no_vars = HashMap::new();
    for doc in &mut docs {
        for (path, expr) in spec {
            let value = eval_expr(doc, &no_vars, expr)?;
            set_path(doc, path, value);
        }
    }
    Ok(docs)
}

fn apply_match(
    docs: Vec<BsonDocument>,
    conditions: &BsonDocument,
) -> Result<Vec<BsonDocument>, GatherlyError> {
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        if matches_all(&doc, conditions)? {
            out.push(doc);
        }
    }
    Ok(out)
}

fn matches_all(doc: &BsonDocument, conditions: &BsonDocument) -> Result<bool, GatherlyError> {
    for (field, cond) in conditions {
        let actual = get_path(doc, field);
        let hit = match cond {
            Bson::Document(ops) => {
                let mut all = true;
                for (op, expected) in ops {
                    let Some(one) = apply_op(actual, op, expected) else {
                        return Err(GatherlyError::Query(format!(
                            "unsupported match operator: {op}"
                        )));
                    };
                    all = all && one;
                }
                all
            }
            literal => apply_op(actual, "$eq", literal).unwrap_or(false),
        };
        if !hit {
            return Ok(false);
        }
    }
    Ok(true)
}

// Expression evaluation for $addFields. Covers what the compiler emits:
// field references, `$$` variable references, `$filter`, `$eq`, and plain
// literals.
fn eval_expr(
    doc: &BsonDocument,
    vars: &HashMap<String, Bson>,
    expr: &Bson,
) -> Result<Bson, GatherlyError> {
    match expr {
        Bson::String(s) => {
            if let Some(var_path) = s.strip_prefix("$$") {
                Ok(resolve_var(vars, var_path))
            } else if let Some(path) = s.strip_prefix('$') {
                Ok(get_path(doc, path).cloned().unwrap_or(Bson::Null))
            } else {
                Ok(expr.clone())
            }
        }
        Bson::Document(d) => {
            if let Some((key, operand)) = single_operator(d) {
                return match key {
                    "$filter" => eval_filter(doc, vars, operand),
                    "$eq" => {
                        let Bson::Array(pair) = operand else {
                            return Err(GatherlyError::Query("$eq expects a two-element array".into()));
                        };
                        let [a, b] = pair.as_slice() else {
                            return Err(GatherlyError::Query("$eq expects a two-element array".into()));
                        };
                        let left = eval_expr(doc, vars, a)?;
                        let right = eval_expr(doc, vars, b)?;
                        Ok(Bson::Boolean(values_equal(&left, &right)))
                    }
                    other => {
                        Err(GatherlyError::Query(format!("unsupported expression operator: {other}")))
                    }
                };
            }
            let mut out = BsonDocument::new();
            for (k, v) in d {
                out.insert(k.clone(), eval_expr(doc, vars, v)?);
            }
            Ok(Bson::Document(out))
        }
        Bson::Array(items) => {
            let evaluated: Result<Vec<Bson>, GatherlyError> =
                items.iter().map(|item| eval_expr(doc, vars, item)).collect();
            Ok(Bson::Array(evaluated?))
        }
        other => Ok(other.clone()),
    }
}

fn single_operator(d: &BsonDocument) -> Option<(&str, &Bson)> {
    if d.len() != 1 {
        return None;
    }
    let (k, v) = d.iter().next()?;
    k.starts_with('$').then_some((k.as_str(), v))
}

fn resolve_var(vars: &HashMap<String, Bson>, var_path: &str) -> Bson {
    let (head, rest) = match var_path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (var_path, None),
    };
    let Some(value) = vars.get(head) else {
        return Bson::Null;
    };
    match (value, rest) {
        (v, None) => v.clone(),
        (Bson::Document(d), Some(rest)) => get_path(d, rest).cloned().unwrap_or(Bson::Null),
        _ => Bson::Null,
    }
}

fn eval_filter(
    doc: &BsonDocument,
    vars: &HashMap<String, Bson>,
    operand: &Bson,
) -> Result<Bson, GatherlyError> {
    let spec = operand
        .as_document()
        .ok_or_else(|| GatherlyError::Query("$filter expects a document".into()))?;
    let input = spec
        .get("input")
        .ok_or_else(|| GatherlyError::Query("$filter missing input".into()))?;
    let binding = spec
        .get_str("as")
        .map_err(|_| GatherlyError::Query("$filter missing as".into()))?;
    let cond = spec
        .get("cond")
        .ok_or_else(|| GatherlyError::Query("$filter missing cond".into()))?;
    let input = eval_expr(doc, vars, input)?;
    let items = match input {
        Bson::Array(items) => items,
        Bson::Null => return Ok(Bson::Null),
        _ => return Err(GatherlyError::Query("$filter input must resolve to an array".into())),
    };
    let mut kept = Vec::new();
    for item in items {
        let mut scope = vars.clone();
        scope.insert(binding.to_string(), item.clone());
        if matches!(eval_expr(doc, &scope, cond)?, Bson::Boolean(true)) {
            kept.push(item);
        }
    }
    Ok(Bson::Array(kept))
}

// Dotted $addFields targets create intermediate subdocuments, so
// "value.organizerList" lands under a `value` document.
fn set_path(root: &mut BsonDocument, path: &str, value: Bson) {
    let (parent, last) = traverse_to_parent(root, path);
    parent.insert(last, value);
}

fn traverse_to_parent<'a>(root: &'a mut BsonDocument, path: &str) -> (&'a mut BsonDocument, String) {
    let mut cur = root;
    let mut iter = path.split('.').peekable();
    let mut last = String::new();
    while let Some(seg) = iter.next() {
        if iter.peek().is_none() {
            last = seg.to_string();
            break;
        }
        cur = ensure_subdoc(cur, seg);
    }
    (cur, last)
}

fn ensure_subdoc<'a>(root: &'a mut BsonDocument, key: &str) -> &'a mut BsonDocument {
    let needs_new = !matches!(root.get(key), Some(Bson::Document(_)));
    if needs_new {
        root.insert(key.to_string(), Bson::Document(BsonDocument::new()));
    }
    match root.get_mut(key) {
        Some(Bson::Document(d)) => d,
        _ => unreachable!(),
    }
}
