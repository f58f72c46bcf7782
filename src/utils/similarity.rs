use crate::error::EngineError;

/// Cosine similarity of two equal-length vectors. Zero-norm input yields 0.0.
pub fn cosine_sim(a: &[f32], b: &[f32]) -> Result<f32, EngineError> {
    if a.len() != b.len() {
        return Err(EngineError::ScoringRuntime(format!(
            "embedding dimensions differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(EngineError::ScoringRuntime("empty embedding".to_string()));
    }

    let mut dot = 0f32;
    let mut na = 0f32;
    let mut nb = 0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let sim = if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    };
    if sim.is_finite() {
        Ok(sim.clamp(-1.0, 1.0))
    } else {
        Err(EngineError::ScoringRuntime("similarity is not finite".to_string()))
    }
}

/// `round(similarity * 100)`, clamped to a percentage.
pub fn to_percentage(similarity: f32) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
