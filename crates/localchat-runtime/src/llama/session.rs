//! Scoped generation session over one `LlamaContext`.

use std::num::NonZeroU32;

use llama_cpp_2::context::LlamaContext;
use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::{AddBos, LlamaModel, Special};
use llama_cpp_2::sampling::LlamaSampler;

use localchat_core::ports::GenerationError;

use crate::config::LlamaConfig;

fn lib_err(e: impl std::fmt::Display) -> GenerationError {
    GenerationError::new(e.to_string())
}

/// Context, batch and sampler for a single prompt. Everything is released on
/// drop, whether generation succeeded or not.
pub(super) struct GenerationSession<'m> {
    model: &'m LlamaModel,
    ctx: LlamaContext<'m>,
    batch: LlamaBatch,
    sampler: LlamaSampler,
    n_ctx: u32,
    n_past: i32,
}

impl<'m> GenerationSession<'m> {
    /// Create a context and evaluate the prompt.
    pub(super) fn open(
        backend: &LlamaBackend,
        model: &'m LlamaModel,
        config: &LlamaConfig,
        prompt: &str,
    ) -> Result<Self, GenerationError> {
        let tokens = model
            .str_to_token(prompt, AddBos::Always)
            .map_err(lib_err)?;

        let n_ctx = config.context_size;
        let n_prompt = u32::try_from(tokens.len()).map_err(lib_err)?;
        if n_prompt >= n_ctx {
            return Err(GenerationError::new(format!(
                "prompt is {n_prompt} tokens, context window is {n_ctx}"
            )));
        }

        let mut params = LlamaContextParams::default()
            .with_n_ctx(NonZeroU32::new(n_ctx))
            .with_n_batch(n_ctx);
        if let Some(threads) = config.threads.and_then(|t| i32::try_from(t).ok()) {
            params = params
                .with_n_threads(threads)
                .with_n_threads_batch(threads);
        }
        let mut ctx = model.new_context(backend, params).map_err(lib_err)?;

        let mut batch = LlamaBatch::new(n_ctx as usize, 1);
        let last = tokens.len() - 1;
        for (i, token) in tokens.into_iter().enumerate() {
            let pos = i32::try_from(i).map_err(lib_err)?;
            batch.add(token, pos, &[0], i == last).map_err(lib_err)?;
        }
        ctx.decode(&mut batch).map_err(lib_err)?;

        let s = config.sampling;
        let sampler = LlamaSampler::chain_simple([
            LlamaSampler::top_k(s.top_k),
            LlamaSampler::top_p(s.top_p, 1),
            LlamaSampler::temp(s.temperature),
            LlamaSampler::dist(s.seed),
        ]);

        Ok(Self {
            model,
            ctx,
            n_past: batch.n_tokens(),
            batch,
            sampler,
            n_ctx,
        })
    }

    /// Sample until end-of-generation, `max_tokens`, or the context is full.
    pub(super) fn complete(&mut self, max_tokens: u32) -> Result<String, GenerationError> {
        let room = self.n_ctx.saturating_sub(u32::try_from(self.n_past).unwrap_or(u32::MAX));
        let budget = max_tokens.min(room);
        let mut bytes = Vec::new();

        for _ in 0..budget {
            let token = self.sampler.sample(&self.ctx, self.batch.n_tokens() - 1);
            self.sampler.accept(token);
            if self.model.is_eog_token(token) {
                break;
            }

            bytes.extend(
                self.model
                    .token_to_bytes(token, Special::Tokenize)
                    .map_err(lib_err)?,
            );

            self.batch.clear();
            self.batch
                .add(token, self.n_past, &[0], true)
                .map_err(lib_err)?;
            self.n_past += 1;
            self.ctx.decode(&mut self.batch).map_err(lib_err)?;
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
