//! Frame sequences for the animated commands.

use super::Animation;
use rand::seq::index;
use rand::Rng;
use std::time::Duration;

const NOW: Duration = Duration::ZERO;
const SLOW: Duration = Duration::from_millis(500);
const FAST: Duration = Duration::from_millis(250);
const DECRYPT_DELAY: Duration = Duration::from_millis(300);
const GLITCH_DELAY: Duration = Duration::from_millis(200);

/// Perturbed frames shown before the clean one.
const GLITCH_FRAMES: usize = 6;

const GLYPHS: &[char] = &['#', '$', '%', '&', '*', '+', '=', '?', '@', '░', '▒', '▓'];

/// Stand-in for characters `decrypt` has not revealed yet.
pub const MASK: char = '_';

fn block(text: &str) -> String {
    format!("```{}```", text)
}

/// Most positions a random effect touches in one frame.
pub fn max_mutations(len: usize) -> usize {
    (len / 4).max(1)
}

pub fn glasses() -> Animation {
    Animation::new()
        .frame(NOW, "( •_•)")
        .frame(SLOW, "( •_•)>⌐■-■")
        .frame(SLOW, "(⌐■_■)")
}

/// Glasses descend onto the face, then "deal with it".
pub fn deal() -> Animation {
    const GLASSES: &str = "    ⌐■-■    ";
    const GLASSES_ON: &str = "   (⌐■_■)   ";
    const DEAL_WITH_IT: &str = "deal with it";
    const BLANK: &str = "            ";
    const FACE: &str = "    (•_•)   ";

    let lines = [BLANK, BLANK, BLANK, FACE];
    let mut animation = Animation::new().frame(NOW, block(&lines.join("\n")));

    for row in 0..3 {
        let mut frame = lines;
        frame[row] = GLASSES;
        animation.push(SLOW, block(&frame.join("\n")));
    }

    let last = [BLANK, DEAL_WITH_IT, BLANK, GLASSES_ON];
    animation.frame(SLOW, block(&last.join("\n")))
}

/// Cycle through `figures` twice, ending on the first one.
fn dance_with(figures: &[&str]) -> Animation {
    let mut animation = Animation::new();
    let Some((&first, rest)) = figures.split_first() else {
        return animation;
    };

    animation.push(NOW, first);
    for figure in rest.iter().chain(figures) {
        animation.push(FAST, *figure);
    }
    animation.frame(FAST, first)
}

pub fn dance() -> Animation {
    dance_with(&[":D|-<", ":D/-<", ":D|-<", r":D\\-<"])
}

pub fn zxcdance() -> Animation {
    dance_with(&["└[^_^]┐", "┌[^_^]┘"])
}

/// Positions that effects may alter.
fn visible_positions(chars: &[char]) -> Vec<usize> {
    chars
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .collect()
}

fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    GLYPHS[rng.gen_range(0..GLYPHS.len())]
}

fn sanitize(text: &str) -> Vec<char> {
    text.chars().map(|c| if c == '`' { '\'' } else { c }).collect()
}

/// Start fully masked and reveal the text a few characters per frame.
///
/// Each frame reveals up to [`max_mutations`] random hidden positions. Of the
/// positions still hidden, at most that many flicker as random glyphs and the
/// rest show [`MASK`]. The last frame is the plain text.
pub fn decrypt<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Animation {
    let chars = sanitize(text);
    let mut hidden = visible_positions(&chars);
    let per_frame = max_mutations(chars.len());

    let render = |hidden: &[usize], rng: &mut R| {
        let mut frame = chars.clone();
        for &i in hidden {
            frame[i] = MASK;
        }

        let flicker = per_frame.min(hidden.len());
        if flicker > 0 {
            for pick in index::sample(rng, hidden.len(), flicker) {
                frame[hidden[pick]] = random_glyph(rng);
            }
        }
        block(&frame.iter().collect::<String>())
    };

    let mut animation = Animation::new();
    animation.push(NOW, render(&hidden, rng));

    while !hidden.is_empty() {
        for _ in 0..per_frame.min(hidden.len()) {
            let pick = rng.gen_range(0..hidden.len());
            hidden.swap_remove(pick);
        }
        animation.push(DECRYPT_DELAY, render(&hidden, rng));
    }

    animation
}

/// Show the text with a random few characters corrupted each frame,
/// settling on the clean text.
pub fn glitch<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Animation {
    let chars = sanitize(text);
    let candidates = visible_positions(&chars);
    let max = max_mutations(chars.len()).min(candidates.len());

    let mut animation = Animation::new();
    for n in 0..GLITCH_FRAMES {
        let mut frame = chars.clone();
        if max > 0 {
            let count = rng.gen_range(1..=max);
            for pick in index::sample(rng, candidates.len(), count) {
                frame[candidates[pick]] = random_glyph(rng);
            }
        }

        let delay = if n == 0 { NOW } else { GLITCH_DELAY };
        animation.push(delay, block(&frame.iter().collect::<String>()));
    }

    animation.frame(GLITCH_DELAY, block(&chars.iter().collect::<String>()))
}
