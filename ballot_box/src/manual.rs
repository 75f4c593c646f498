/*!

This is the long-form manual for `ballot_box` and the `booth` program.

## Roster formats

Both rosters are plain text files with one record per line. Fields are separated by
a comma (another single character can be set with the `delimiter` option). The first
field of every line is ignored, and whitespace around fields is removed. Lines with
fewer than six fields are skipped.

### Candidates

| position | content                      |
|----------|------------------------------|
| 0        | ignored (usually a row id)   |
| 1        | name                         |
| 2        | ballot number                |
| 3        | party                        |
| 4        | state code                   |
| 5        | office code (F, E, S, G, P)  |

An office code outside of the five known codes is kept, with the office name
`Unknown Office`. Such a candidate can never receive a vote.

### Voters

| position | content                      |
|----------|------------------------------|
| 0        | ignored                      |
| 1        | name                         |
| 2        | identity document number     |
| 3        | voter registration id        |
| 4        | municipality                 |
| 5        | state code                   |

## Voting

A voting run is attached to the state of the station. For each voter, the booth asks for
the five offices in this order: Federal Deputy (`F`), State Deputy (`E`), Senator (`S`),
Governor (`G`), President (`P`). The answers are:

* `B` blank vote
* `N` null vote
* a ballot number, which must then be confirmed with `S` (or rejected with `N`)
* `CANCEL` to throw away the ballot being filled

President candidates can be chosen from any station. For the other offices, only the
candidates of the station state are valid.

Type `END` instead of a registration id to close the run. The ballots of the run are then
appended to the ballot store as one batch.

## Results

The tabulation produces one block per state:
- eligible voters is the number of ballots cast in that state
- the percentage of a candidate is computed over the nominal votes of the state (all
  offices together)
- the percentages of blank and null votes are computed over the eligible voters,
  and may thus exceed 100%

*/
