// Mean pooling over the token axis of a hidden-state tensor.

/// Average the token vectors of one sequence, counting only positions whose
/// attention mask is non-zero.
///
/// `hidden` is the flattened `[seq_len, dim]` slice for a single text. With
/// no padding in the mask this is the plain mean over every token, including
/// `[CLS]` and `[SEP]`. A mask with no live positions yields a zero vector.
pub fn mean_pool(hidden: &[f32], attention_mask: &[i64], seq_len: usize, dim: usize) -> Vec<f64> {
    let mut sum = vec![0.0_f64; dim];
    let mut mask_sum = 0.0_f64;

    for (position, &mask) in attention_mask.iter().enumerate().take(seq_len) {
        if mask <= 0 {
            continue;
        }
        let weight = mask as f64;
        mask_sum += weight;
        let token = &hidden[position * dim..(position + 1) * dim];
        for (acc, &value) in sum.iter_mut().zip(token) {
            *acc += value as f64 * weight;
        }
    }

    if mask_sum > 0.0 {
        for value in &mut sum {
            *value /= mask_sum;
        }
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_two_tokens() {
        let hidden = [1.0, 2.0, 3.0, 4.0];
        let pooled = mean_pool(&hidden, &[1, 1], 2, 2);
        assert_eq!(pooled, vec![2.0, 3.0]);
    }

    #[test]
    fn test_padding_is_ignored() {
        let hidden = [1.0, 1.0, 3.0, 3.0, 100.0, 100.0];
        let pooled = mean_pool(&hidden, &[1, 1, 0], 3, 2);
        assert_eq!(pooled, vec![2.0, 2.0]);
    }

    #[test]
    fn test_single_token_is_identity() {
        let hidden = [0.5, -0.25, 0.125];
        let pooled = mean_pool(&hidden, &[1], 1, 3);
        assert_eq!(pooled, vec![0.5, -0.25, 0.125]);
    }

    #[test]
    fn test_all_masked_gives_zero_vector() {
        let hidden = [9.0, 9.0];
        let pooled = mean_pool(&hidden, &[0], 1, 2);
        assert_eq!(pooled, vec![0.0, 0.0]);
    }

    #[test]
    fn test_output_length_is_dim() {
        let hidden = vec![0.0_f32; 5 * 768];
        let pooled = mean_pool(&hidden, &[1; 5], 5, 768);
        assert_eq!(pooled.len(), 768);
    }
}
