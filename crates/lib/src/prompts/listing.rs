//! Prompts that analyse or describe a single listing.

pub const SENTIMENT_ANALYSIS_PROMPT: &str = r#"Analyze the following reviews for {pg_name} and provide a comprehensive sentiment analysis.

Reviews:
{reviews}

Please provide:
1. Overall sentiment (positive/negative/neutral)
2. Count of positive, negative, and neutral reviews
3. Key insights (2-3 sentences)
4. Top 3 positive keywords and top 3 negative keywords

Return ONLY a valid JSON object with this exact structure:
{
  "overall_sentiment": "positive/negative/neutral",
  "positive_count": <number>,
  "negative_count": <number>,
  "neutral_count": <number>,
  "insights": "<2-3 sentence summary>",
  "keywords": {
    "positive": ["keyword1", "keyword2", "keyword3"],
    "negative": ["keyword1", "keyword2", "keyword3"]
  }
}"#;

pub const HIDDEN_CHARGES_PROMPT: &str = r#"You are analyzing a PG (Paying Guest) listing for transparency and potential hidden charges.

COMPLETE LISTING INFORMATION:
Monthly Rent: ₹{rent}
Security Deposit: ₹{deposit}

Amenities Provided: {amenities}

**MAINTENANCE CHARGES:** {maintenance}
**ELECTRICITY CHARGES:** {electricity}
**FOOD AVAILABILITY:** {food}

Property Description:
{description}

House Rules & Terms:
{rules}

CRITICAL INSTRUCTIONS - READ THE DATA ABOVE FIRST!

STEP 1: CHECK WHAT IS ACTUALLY SPECIFIED
- If MAINTENANCE CHARGES shows an amount, it IS specified.
- If ELECTRICITY CHARGES shows a number or rate (like "200" or "₹5/unit"), it IS specified.
- If FOOD AVAILABILITY says "Yes" or describes food, it IS specified.
- ONLY if a field says "Not specified" is it missing.

STEP 2: CALCULATE TRANSPARENCY SCORE
BASE: 40 points (rent + deposit provided)
+15 maintenance specified, +15 electricity specified, +10 food specified,
+10 amenities list with 3+ items, +5 description of 50+ words, +5 rules specified.
-10 maintenance "Not specified", -10 electricity "Not specified",
-5 food "Not specified", -5 no or very short description.

SCORE RANGES: 85-100 excellent, 70-84 very good, 55-69 good, 40-54 fair, 0-39 poor.

STEP 3: LIST ONLY ACTUAL MISSING INFO
For "potential_hidden_charges" and "missing_information" ONLY include items that show "Not specified" above.
Never flag a charge whose amount is given.

Return ONLY valid JSON (no markdown, no text before/after):
{
  "risk_level": "low/medium/high",
  "potential_hidden_charges": [
    {"charge": "name", "reason": "why hidden"}
  ],
  "missing_information": ["only items showing 'Not specified'"],
  "questions_to_ask": ["questions about unclear items"],
  "transparency_score": <number 0-100>
}

START WITH { - NO OTHER TEXT!"#;

pub const DESCRIPTION_PROMPT: &str = r#"Write a compelling and honest property description for a PG/hostel listing with these details:

- Location: {location}
- Monthly Rent: ₹{rent}
- Room Type: {room_type}
- Amenities: {amenities}

Write a 3-4 sentence description that:
1. Highlights key features
2. Mentions location benefits
3. Targets student/working professional audience
4. Sounds authentic and trustworthy

Return only the description text, no JSON."#;
