/*!
 * # Editing Core Module
 *
 * Event-driven control flow for the inference pipeline.
 *
 * A [`Session`] owns the document buffer (an `xi_rope::Rope`, the single
 * source of truth), the session-scoped heading ratchet, and the one-shot
 * self-trigger suppression flag. Every buffer mutation is reported through
 * [`Session::observe`], which runs the full pipeline synchronously:
 *
 * 1. Empty buffer resets the heading ratchet.
 * 2. A pending self-triggered flag is consumed and the event skipped,
 *    preventing re-entrant rewrite loops.
 * 3. The paragraph-boundary gate fires only when exactly one trailing
 *    newline was just added (last char `'\n'`, previous char not).
 * 4. Old and new text are segmented; a new non-empty last block is
 *    classified, heading labels prefix it, body blocks go through the
 *    inline annotator.
 * 5. The block sequence is reassembled and adopted as the buffer.
 *
 * Processing is strictly sequential and single-threaded: no background
 * work, no concurrent buffer access. Model failures degrade to leaving the
 * text exactly as typed.
 */

pub mod outcome;
pub mod session;

pub use outcome::EditOutcome;
pub use session::Session;
