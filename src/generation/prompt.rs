// SPDX-License-Identifier: GPL-3.0-only

//! Instruction text sent alongside the photo

/// Build the edit instruction for one background scenario
pub fn build_prompt(scenario: &str) -> String {
    format!(
        "Edit this image to create a festive Qatar National Day 2025 celebration photo.\n\
         \n\
         Instructions:\n\
         1. FOREGROUND: Keep the person(s) in the original photo exactly as they are. \
         Do not alter their faces or clothing significantly. Maintain realism.\n\
         2. BACKGROUND: Replace the current background completely with this scene: {scenario}\n\
         3. INTEGRATION: Ensure the lighting on the person matches the new background.\n\
         4. STYLE: High-quality, photorealistic, patriotic Qatari theme (Maroon #8A1538 and White).\n\
         \n\
         Output ONLY the resulting image."
    )
}
